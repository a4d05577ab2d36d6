//! Per-service noise suppression applied to request deltas.
//!
//! EC2 adds `TagSpecifications` to request shapes across the board; reporting
//! it on every operation drowns the real changes. This is the only rule and
//! it must stay scoped to the `ec2` service.

use crate::traversal::Delta;

pub const EC2_SERVICE: &str = "ec2";
pub const EC2_NOISY_MEMBER: &str = "TagSpecifications";

/// Apply the suppression rules for `service` to an operation's request delta
///
/// Returns `None` when nothing is left to report on the request side.
pub fn suppress_request(service: &str, request: Option<Delta>) -> Option<Delta> {
    let request = request?;
    if service != EC2_SERVICE {
        return Some(request);
    }

    match request {
        Delta::Members(mut members) if members.contains_key(EC2_NOISY_MEMBER) => {
            members.remove(EC2_NOISY_MEMBER);
            if members.is_empty() {
                None
            } else {
                Some(Delta::Members(members))
            }
        }
        other => Some(other),
    }
}
