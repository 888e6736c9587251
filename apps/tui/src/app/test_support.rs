use crate::app::message::{AppEvent, Command};
use crate::app::state::App;
use crate::config::{AppConfig, Endpoints};
use crate::domain::{FamilyTreeData, Gender, Member};
use crate::request::Generation;
use crate::viewport::ZoomLimits;
use std::path::PathBuf;
use std::time::Duration;

pub fn config() -> AppConfig {
    AppConfig {
        endpoints: Endpoints::new("http://localhost:8000"),
        tree_id: "16".to_string(),
        log_file: PathBuf::from("test.log"),
        debug: false,
        zoom: ZoomLimits::default(),
        request_timeout: Duration::from_secs(1),
    }
}

pub fn member(id: &str, name: &str, children: &[&str], depth: u32) -> Member {
    Member {
        id: id.to_string(),
        fullname: name.to_string(),
        nickname: None,
        gender: Gender::Male,
        birth_date: None,
        death_date: None,
        spouse_id: None,
        parent_ids: None,
        children_ids: Some(children.iter().map(|c| (*c).to_string()).collect()),
        domicile: None,
        bio: None,
        photo_url: None,
        depth,
    }
}

/// Root with two children.
pub fn data() -> FamilyTreeData {
    FamilyTreeData {
        root_id: "1".to_string(),
        members: vec![
            member("1", "Hasan", &["2", "3"], 0),
            member("2", "Dewi", &[], 1),
            member("3", "Rudi", &[], 1),
        ],
    }
}

pub fn tree_generation(app: &mut App) -> Generation {
    match app.take_commands().pop() {
        Some(Command::FetchTree(request)) => request.generation,
        other => panic!("expected tree fetch, got {other:?}"),
    }
}

pub fn loaded_app() -> App {
    let mut app = App::new(config());
    app.load_tree();
    let generation = tree_generation(&mut app);
    app.dispatch(AppEvent::TreeLoaded {
        generation,
        result: Ok(data()),
    });
    app
}
