use crate::domain::{FamilyTreeData, Member};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Id lookup over a flat member list. The first record wins on duplicate ids.
#[derive(Debug, Clone)]
pub struct MemberIndex<'a> {
    by_id: HashMap<&'a str, &'a Member>,
}

impl<'a> MemberIndex<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for member in members {
            by_id.entry(member.id.as_str()).or_insert(member);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Member> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// One person in the reconstructed hierarchy, borrowing the fetched records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode<'a> {
    pub member: &'a Member,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse: Option<&'a Member>,
    pub children: Vec<TreeNode<'a>>,
    pub level: usize,
}

impl<'a> TreeNode<'a> {
    pub const fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Depth-first, pre-order, children left to right.
    pub fn walk(&self) -> impl Iterator<Item = &TreeNode<'a>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

/// Builds the subtree rooted at `member_id`.
///
/// Unresolvable ids yield `None` and are dropped from their parent's
/// children; an unresolvable spouse is omitted. A member reached again while
/// already on the current path ends that branch.
pub fn build_tree<'a>(member_id: &str, members: &'a [Member], level: usize) -> Option<TreeNode<'a>> {
    let index = MemberIndex::new(members);
    build_from_index(member_id, &index, level)
}

pub fn build_from_index<'a>(
    member_id: &str,
    index: &MemberIndex<'a>,
    level: usize,
) -> Option<TreeNode<'a>> {
    let mut path = HashSet::new();
    build_node(member_id, index, level, &mut path)
}

/// Tree for the designated root, or `None` when the root does not resolve.
pub fn build_family_tree(data: &FamilyTreeData) -> Option<TreeNode<'_>> {
    build_tree(&data.root_id, &data.members, 0)
}

fn build_node<'a>(
    member_id: &str,
    index: &MemberIndex<'a>,
    level: usize,
    path: &mut HashSet<&'a str>,
) -> Option<TreeNode<'a>> {
    let member = index.get(member_id)?;
    if !path.insert(member.id.as_str()) {
        tracing::warn!(member_id, level, "member is its own ancestor, branch dropped");
        return None;
    }

    let spouse = member.spouse_id.as_deref().and_then(|id| index.get(id));
    if spouse.is_none() {
        if let Some(spouse_id) = member.spouse_id.as_deref() {
            tracing::debug!(member_id, spouse_id, "spouse not found, omitted");
        }
    }

    let children = member
        .children_ids()
        .iter()
        .filter_map(|child_id| build_node(child_id, index, level + 1, path))
        .collect();

    path.remove(member.id.as_str());

    Some(TreeNode {
        member,
        spouse,
        children,
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use proptest::prelude::*;

    fn person(id: &str, name: &str, children: &[&str]) -> Member {
        Member {
            id: id.to_string(),
            fullname: name.to_string(),
            nickname: None,
            gender: Gender::Male,
            birth_date: None,
            death_date: None,
            spouse_id: None,
            parent_ids: None,
            children_ids: if children.is_empty() {
                None
            } else {
                Some(children.iter().map(|c| (*c).to_string()).collect())
            },
            domicile: None,
            bio: None,
            photo_url: None,
            depth: 0,
        }
    }

    fn names<'a>(nodes: &'a [TreeNode<'a>]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.member.fullname.as_str()).collect()
    }

    #[test]
    fn root_with_two_children_in_order() {
        let members = vec![
            person("1", "Root", &["2", "3"]),
            person("2", "Child1", &[]),
            person("3", "Child2", &[]),
        ];
        let tree = build_tree("1", &members, 0).expect("root resolves");
        assert_eq!(tree.level, 0);
        assert!(tree.is_root());
        assert_eq!(names(&tree.children), ["Child1", "Child2"]);
        assert!(tree.children.iter().all(|c| c.level == 1));
    }

    #[test]
    fn unknown_root_is_absent() {
        let members = vec![person("1", "Root", &[])];
        assert!(build_tree("99", &members, 0).is_none());

        let data = FamilyTreeData {
            members,
            root_id: "99".to_string(),
        };
        assert!(build_family_tree(&data).is_none());
    }

    #[test]
    fn stale_child_ids_are_dropped_and_order_kept() {
        let members = vec![
            person("1", "Root", &["4", "gone", "2", "3"]),
            person("2", "B", &[]),
            person("3", "C", &[]),
            person("4", "A", &[]),
        ];
        let tree = build_tree("1", &members, 0).expect("root resolves");
        assert_eq!(names(&tree.children), ["A", "B", "C"]);
    }

    #[test]
    fn dangling_spouse_is_omitted() {
        let mut root = person("1", "Root", &[]);
        root.spouse_id = Some("404".to_string());
        let mut with_spouse = person("2", "Other", &[]);
        with_spouse.spouse_id = Some("3".to_string());
        let members = vec![root, with_spouse, person("3", "Partner", &[])];

        assert!(build_tree("1", &members, 0).expect("root").spouse.is_none());
        let node = build_tree("2", &members, 0).expect("member");
        assert_eq!(node.spouse.map(|s| s.fullname.as_str()), Some("Partner"));
    }

    #[test]
    fn level_argument_anchors_subtree_depth() {
        let members = vec![person("1", "Root", &["2"]), person("2", "Kid", &[])];
        let tree = build_tree("1", &members, 3).expect("root");
        assert_eq!(tree.level, 3);
        assert_eq!(tree.children[0].level, 4);
    }

    #[test]
    fn cycles_terminate_the_branch() {
        let members = vec![
            person("1", "Root", &["2", "1"]),
            person("2", "Kid", &["1", "3"]),
            person("3", "Grandkid", &[]),
        ];
        let tree = build_tree("1", &members, 0).expect("root");
        assert_eq!(names(&tree.children), ["Kid"]);
        assert_eq!(names(&tree.children[0].children), ["Grandkid"]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn shared_descendant_appears_under_each_parent() {
        let members = vec![
            person("1", "Root", &["2", "3"]),
            person("2", "Left", &["4"]),
            person("3", "Right", &["4"]),
            person("4", "Shared", &[]),
        ];
        let tree = build_tree("1", &members, 0).expect("root");
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn nodes_borrow_the_source_records() {
        let members = vec![person("1", "Root", &["2"]), person("2", "Kid", &[])];
        let tree = build_tree("1", &members, 0).expect("root");
        assert!(std::ptr::eq(tree.member, &members[0]));
        assert!(std::ptr::eq(tree.children[0].member, &members[1]));
        assert_eq!(build_tree("1", &members, 0), Some(tree));
    }

    #[test]
    fn walk_is_preorder() {
        let members = vec![
            person("1", "Root", &["2", "4"]),
            person("2", "A", &["3"]),
            person("3", "A1", &[]),
            person("4", "B", &[]),
        ];
        let tree = build_tree("1", &members, 0).expect("root");
        let order: Vec<&str> = tree.walk().map(|n| n.member.fullname.as_str()).collect();
        assert_eq!(order, ["Root", "A", "A1", "B"]);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_record() {
        let members = vec![person("1", "First", &[]), person("1", "Second", &[])];
        let index = MemberIndex::new(&members);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("1").map(|m| m.fullname.as_str()), Some("First"));
    }

    /// Members `0..n` whose children point only forward, plus stale ids past `n`.
    fn forward_family() -> impl Strategy<Value = Vec<Member>> {
        (1usize..24).prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(0usize..n + 6, 0..4), n).prop_map(
                move |links| {
                    links
                        .into_iter()
                        .enumerate()
                        .map(|(i, kids)| {
                            let kids: Vec<String> = kids
                                .into_iter()
                                .filter(|&k| k > i)
                                .map(|k| k.to_string())
                                .collect();
                            let mut m = person(&i.to_string(), &format!("M{i}"), &[]);
                            m.children_ids = Some(kids);
                            m
                        })
                        .collect()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn levels_increase_by_one_per_generation(members in forward_family()) {
            let tree = build_tree("0", &members, 0).expect("root 0 always exists");
            prop_assert_eq!(tree.level, 0);
            for node in tree.walk() {
                for child in &node.children {
                    prop_assert_eq!(child.level, node.level + 1);
                }
            }
        }

        #[test]
        fn children_follow_child_id_order_minus_unresolved(members in forward_family()) {
            let index = MemberIndex::new(&members);
            let tree = build_tree("0", &members, 0).expect("root 0 always exists");
            for node in tree.walk() {
                let expected: Vec<&str> = node
                    .member
                    .children_ids()
                    .iter()
                    .map(String::as_str)
                    .filter(|id| index.get(id).is_some())
                    .collect();
                let actual: Vec<&str> = node.children.iter().map(|c| c.member.id.as_str()).collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
