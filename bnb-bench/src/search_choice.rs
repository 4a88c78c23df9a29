use clap::ValueEnum;
use bnb_search::{BranchingRule, NodeSelection};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum NodeSelectionChoice {
    BestBound,
    DepthFirst,
}

impl From<NodeSelectionChoice> for NodeSelection {
    fn from(choice: NodeSelectionChoice) -> Self {
        match choice {
            NodeSelectionChoice::BestBound => NodeSelection::BestBound,
            NodeSelectionChoice::DepthFirst => NodeSelection::DepthFirst,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BranchingChoice {
    MostFractional,
    FirstFractional,
}

impl From<BranchingChoice> for BranchingRule {
    fn from(choice: BranchingChoice) -> Self {
        match choice {
            BranchingChoice::MostFractional => BranchingRule::MostFractional,
            BranchingChoice::FirstFractional => BranchingRule::FirstFractional,
        }
    }
}
