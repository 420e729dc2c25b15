use super::*;

pub(super) fn handle_actions(app: &mut App, endpoints: &Endpoints, event_tx: &Sender<AppEvent>) {
    while let Some(action) = app.take_action() {
        match action {
            AppAction::SendChat(request) => {
                start_chat(request, endpoints.clone(), event_tx.clone());
            }
        }
    }
}

pub(super) fn start_load(source: IssueSource, endpoints: Endpoints, event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let result = block_on_api(&endpoints, |api| async move {
            load_issues(&source, &api).await
        });
        let event = match result {
            Ok(issues) => AppEvent::IssuesLoaded(issues),
            Err(error) => {
                warn!(error = %format!("{:#}", error), "issue load failed");
                AppEvent::IssuesFailed(format!("{:#}", error))
            }
        };
        let _ = event_tx.send(event);
    });
}

fn start_chat(request: ChatRequest, endpoints: Endpoints, event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let result = block_on_api(&endpoints, |api| async move { api.chat(&request).await });
        let event = match result {
            Ok(response) => AppEvent::ChatReplied(response.into_reply()),
            Err(error) => {
                warn!(error = %format!("{:#}", error), "chat request failed");
                AppEvent::ChatFailed(format!("{:#}", error))
            }
        };
        let _ = event_tx.send(event);
    });
}

/// Runs one request on a fresh current-thread runtime owned by the calling
/// background thread.
fn block_on_api<T, F, Fut>(endpoints: &Endpoints, request: F) -> Result<T>
where
    F: FnOnce(HttpIssueApi) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let api = HttpIssueApi::new(endpoints)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(request(api))
}
