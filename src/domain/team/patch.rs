/// Partial update for a team
///
/// Every attribute is optional. `None` leaves the stored value untouched, so
/// an update can never clear an optional attribute, and the identifier is
/// not patchable at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPatch {
    pub team_name: Option<String>,
    pub city: Option<String>,
    pub owner: Option<String>,
    pub coach: Option<String>,
    pub captain: Option<String>,
    pub established_year: Option<i32>,
    pub years_won: Option<Vec<i32>>,
}

impl TeamPatch {
    /// Returns true when the patch carries no changes
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_is_empty() {
        assert!(TeamPatch::default().is_empty());
    }

    #[test]
    fn patch_with_a_field_is_not_empty() {
        let patch = TeamPatch {
            coach: Some("Stephen Fleming".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
