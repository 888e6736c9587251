use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::domain::{FamilyTreeData, Member};
use crate::error::FetchError;
use crate::tree::{build_family_tree, TreeNode};
use color_eyre::Result;
use serde::Serialize;

/// Run the application in headless mode (no UI)
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let client = ApiClient::new(config.endpoints.clone(), config.request_timeout)?;
    tracing::info!(tree_id = %config.tree_id, url = %config.endpoints.family_tree(&config.tree_id), "headless fetch");
    let data = client.get_tree(&config.tree_id).await?;

    if json {
        render_headless_json(&data)?;
    } else {
        render_headless_outline(&data);
    }

    Ok(())
}

fn render_headless_outline(data: &FamilyTreeData) {
    match build_family_tree(data) {
        Some(root) => {
            println!("\n{} Family Tree", root.member.fullname);
            println!("{}", "=".repeat(root.member.fullname.chars().count() + 12));
            print!("{}", render_outline(&root));
            println!("\nMembers shown: {} of {}", count_persons(&root), data.members.len());
        }
        None => println!("{}", FetchError::EmptyData),
    }
}

fn render_headless_json(data: &FamilyTreeData) -> Result<()> {
    let tree = build_family_tree(data);
    let output = HeadlessTree {
        title: tree.as_ref().map(|root| format!("{} Family Tree", root.member.fullname)),
        root_id: &data.root_id,
        member_count: data.members.len(),
        tree,
    };
    let json = serde_json::to_string_pretty(&output)?;
    println!("{json}");
    Ok(())
}

/// Box-drawing outline, one person per line, spouse on the member's line.
pub fn render_outline(root: &TreeNode<'_>) -> String {
    let mut out = person_line(root);
    out.push('\n');
    write_children(&mut out, root, "");
    out
}

fn write_children(out: &mut String, node: &TreeNode<'_>, prefix: &str) {
    let last_index = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, indent) = if i == last_index {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&person_line(child));
        out.push('\n');
        write_children(out, child, &format!("{prefix}{indent}"));
    }
}

fn person_line(node: &TreeNode<'_>) -> String {
    let mut line = member_label(node.member);
    if let Some(spouse) = node.spouse {
        line.push_str(" ─♥─ ");
        line.push_str(&member_label(spouse));
    }
    line
}

fn member_label(member: &Member) -> String {
    let marker = if member.has_death_date() { " ✝" } else { "" };
    format!("{} ({}){marker}", member.fullname, member.lifespan_label())
}

fn count_persons(root: &TreeNode<'_>) -> usize {
    root.walk()
        .map(|node| 1 + usize::from(node.spouse.is_some()))
        .sum()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlessTree<'a> {
    title: Option<String>,
    root_id: &'a str,
    member_count: usize,
    tree: Option<TreeNode<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use crate::tree::build_tree;

    fn member(id: &str, name: &str, children: &[&str]) -> Member {
        Member {
            id: id.to_string(),
            fullname: name.to_string(),
            nickname: None,
            gender: Gender::Male,
            birth_date: Some("1950-02-03".to_string()),
            death_date: None,
            spouse_id: None,
            parent_ids: None,
            children_ids: Some(children.iter().map(|c| (*c).to_string()).collect()),
            domicile: None,
            bio: None,
            photo_url: None,
            depth: 0,
        }
    }

    #[test]
    fn outline_nests_children_in_order() {
        let mut root = member("1", "Root", &["2", "3"]);
        root.spouse_id = Some("9".to_string());
        let mut late = member("3", "Child2", &[]);
        late.death_date = Some("2001-01-01".to_string());
        let members = vec![
            root,
            member("2", "Child1", &["4"]),
            late,
            member("4", "Grandchild", &[]),
            member("9", "Partner", &[]),
        ];
        let tree = build_tree("1", &members, 0).expect("root");

        let expected = "\
Root (1950 - Present) ─♥─ Partner (1950 - Present)
├── Child1 (1950 - Present)
│   └── Grandchild (1950 - Present)
└── Child2 (1950 - 2001) ✝
";
        assert_eq!(render_outline(&tree), expected);
        assert_eq!(count_persons(&tree), 5);
    }

    #[test]
    fn json_output_nests_tree() {
        let data = FamilyTreeData {
            root_id: "1".to_string(),
            members: vec![member("1", "Root", &["2"]), member("2", "Kid", &[])],
        };
        let tree = build_family_tree(&data);
        let output = HeadlessTree {
            title: Some("Root Family Tree".to_string()),
            root_id: &data.root_id,
            member_count: 2,
            tree,
        };
        let value = serde_json::to_value(&output).expect("serializable");
        assert_eq!(value["memberCount"], 2);
        assert_eq!(value["tree"]["children"][0]["member"]["fullname"], "Kid");
        assert_eq!(value["tree"]["children"][0]["level"], 1);
    }
}
