use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use mlb_api::client::MlbApi;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs the fetch gateway on its own task: receives requests, drives the
/// stats client, answers on the response channel. No retry, no caching;
/// a failed fetch is one Failed response and the next selection tries again.
pub struct NetworkWorker {
    client: MlbApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: MlbApi::new(),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::LoadSchedule { date, generation } => {
                    debug!("loading schedule for {date}");
                    let result = self.client.fetch_schedule(date).await.map_err(|e| e.to_string());
                    NetworkResponse::ScheduleLoaded { generation, result }
                }
                NetworkRequest::LoadRosters { home, away, generation } => {
                    debug!("loading rosters for teams {:?} / {:?}", home.id, away.id);
                    let result = self
                        .client
                        .fetch_rosters(&home, &away)
                        .await
                        .map_err(|e| e.to_string());
                    NetworkResponse::RosterLoaded { generation, result }
                }
                NetworkRequest::LoadPlayerLog { player_id, season, generation } => {
                    debug!("loading {season} game log for player {player_id}");
                    let result = self
                        .client
                        .fetch_player_log(player_id, season)
                        .await
                        .map_err(|e| e.to_string());
                    NetworkResponse::PlayerLogLoaded { generation, result }
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(response_is_ok(&response)).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

fn response_is_ok(response: &NetworkResponse) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { .. } => true,
        NetworkResponse::ScheduleLoaded { result, .. } => result.is_ok(),
        NetworkResponse::RosterLoaded { result, .. } => result.is_ok(),
        NetworkResponse::PlayerLogLoaded { result, .. } => result.is_ok(),
    }
}
