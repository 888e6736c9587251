use crate::api::{DetailFetcher, TreeFetcher};
use crate::app::{handle_event, App, AppEvent, Command, TreeRequest};
use crate::detail::spawn_detail_fetch;
use crate::ui;
use color_eyre::Result;
use crossterm::event;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Run the main application event loop
pub async fn run<F>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    fetcher: Arc<F>,
) -> Result<()>
where
    F: TreeFetcher + DetailFetcher,
{
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (events, mut inbox) = mpsc::unbounded_channel::<AppEvent>();
    app.load_tree();

    loop {
        run_commands(app, &fetcher, &events);
        drain_inbox(app, &mut inbox);

        // Update animations
        app.update();

        terminal
            .draw(|f| {
                app.screen = f.area();
                ui::ui(app, f);
            })
            .map_err(|e| color_eyre::eyre::eyre!("Terminal draw error: {e}"))?;

        // Yields to the runtime so finished fetches land before the next poll.
        tokio::task::yield_now().await;

        match event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)) {
            Ok(true) => match event::read() {
                Ok(event) => handle_event(app, event),
                Err(e) => tracing::warn!(error = %e, "failed to read terminal event"),
            },
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "failed to poll terminal events"),
        }

        if !app.running {
            break;
        }
    }

    tracing::info!("event loop finished");
    Ok(())
}

/// Spawns every queued fetch; results come back through `events`.
pub fn run_commands<F>(app: &mut App, fetcher: &Arc<F>, events: &UnboundedSender<AppEvent>) -> Vec<JoinHandle<()>>
where
    F: TreeFetcher + DetailFetcher,
{
    app.take_commands()
        .into_iter()
        .map(|command| match command {
            Command::FetchTree(request) => spawn_tree_fetch(Arc::clone(fetcher), request, events.clone()),
            Command::FetchDetail(request) => spawn_detail_fetch(Arc::clone(fetcher), request, events.clone()),
        })
        .collect()
}

fn spawn_tree_fetch<F: TreeFetcher>(
    fetcher: Arc<F>,
    request: TreeRequest,
    events: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = fetcher.fetch_tree(&request.tree_id).await;
        let event = AppEvent::TreeLoaded {
            generation: request.generation,
            result,
        };
        if events.send(event).is_err() {
            tracing::debug!("event channel closed before tree response");
        }
    })
}

fn drain_inbox(app: &mut App, inbox: &mut UnboundedReceiver<AppEvent>) {
    while let Ok(event) = inbox.try_recv() {
        app.dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{config, data};
    use crate::app::{Selection, TreePage};
    use crate::detail::DetailState;
    use crate::domain::{FamilyTreeData, Gender, MemberDetail, MemberExtras};
    use crate::error::FetchError;
    use std::future::Future;

    struct FixedBackend;

    impl TreeFetcher for FixedBackend {
        fn fetch_tree(
            &self,
            _tree_id: &str,
        ) -> impl Future<Output = Result<FamilyTreeData, FetchError>> + Send {
            async { Ok(data()) }
        }
    }

    impl DetailFetcher for FixedBackend {
        fn fetch_detail(
            &self,
            member_id: &str,
        ) -> impl Future<Output = Result<MemberDetail, FetchError>> + Send {
            let id = member_id.to_string();
            async move {
                Ok(MemberDetail {
                    fullname: format!("Member {id}"),
                    id,
                    nickname: None,
                    gender: Gender::Female,
                    birth_date: None,
                    death_date: None,
                    photo_url: None,
                    bio: None,
                    detail: MemberExtras::default(),
                })
            }
        }
    }

    async fn settle(app: &mut App, fetcher: &Arc<FixedBackend>, events: &UnboundedSender<AppEvent>, inbox: &mut UnboundedReceiver<AppEvent>) {
        for handle in run_commands(app, fetcher, events) {
            handle.await.expect("fetch task");
        }
        drain_inbox(app, inbox);
    }

    #[tokio::test]
    async fn commands_round_trip_through_the_channel() {
        let fetcher = Arc::new(FixedBackend);
        let (events, mut inbox) = mpsc::unbounded_channel();
        let mut app = App::new(config());

        app.load_tree();
        settle(&mut app, &fetcher, &events, &mut inbox).await;
        assert!(matches!(app.page, TreePage::Ready(_)));

        app.dispatch(AppEvent::Selected(Selection {
            member_id: "2".to_string(),
        }));
        settle(&mut app, &fetcher, &events, &mut inbox).await;
        assert!(matches!(
            app.detail.state(),
            DetailState::Ready { detail, .. } if detail.fullname == "Member 2"
        ));
    }
}
