/// The branch a pull request targets, checked against the gated branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_gated: bool,
}

impl BranchContext {
    /// Create a branch context relative to the configured target branch
    pub fn new(name: impl Into<String>, target_branch: &str) -> Self {
        let name_str = name.into();
        let short = name_str.strip_prefix("refs/heads/").unwrap_or(&name_str);
        let is_gated = short == target_branch;

        BranchContext {
            name: name_str,
            is_gated,
        }
    }

    /// Check if pull requests into this branch are subject to the version policy
    pub fn is_gated(&self) -> bool {
        self.is_gated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_branch_is_gated() {
        let branch = BranchContext::new("main", "main");
        assert!(branch.is_gated());
    }

    #[test]
    fn test_full_ref_is_gated() {
        let branch = BranchContext::new("refs/heads/main", "main");
        assert!(branch.is_gated());
        assert_eq!(branch.name, "refs/heads/main");
    }

    #[test]
    fn test_other_branch_is_not_gated() {
        let branch = BranchContext::new("develop", "main");
        assert!(!branch.is_gated());
        assert!(!BranchContext::new("main-old", "main").is_gated());
    }
}
