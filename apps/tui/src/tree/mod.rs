// Tree reconstruction and layout
// Flat member records in, positioned cards and connector segments out

pub mod builder;
pub mod layout;

pub use builder::{build_family_tree, build_from_index, build_tree, MemberIndex, TreeNode};
pub use layout::{Connector, ConnectorKind, CoupleCard, PersonCard, TreeLayout};
