use super::*;

pub(super) fn handle_events(app: &mut App, event_rx: &Receiver<AppEvent>) {
    while let Ok(event) = event_rx.try_recv() {
        match event {
            AppEvent::IssuesLoaded(issues) => app.finish_load(Ok(issues)),
            AppEvent::IssuesFailed(message) => app.finish_load(Err(message)),
            AppEvent::ChatReplied(reply) => app.finish_chat(Ok(reply)),
            AppEvent::ChatFailed(message) => app.finish_chat(Err(message)),
        }
    }
}
