pub mod csv;
pub mod keys;
pub mod table;

use crate::aggregate::VulnerabilityGroup;

/// Renders an ordered sequence of vulnerability groups.
pub trait Reporter {
    fn report(&self, groups: &[VulnerabilityGroup]) -> String;
}
