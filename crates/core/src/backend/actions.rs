//! Backend actions
//!
//! Every state change goes through one of these methods. Connector
//! failures never escape as panics or unhandled errors: they are logged and
//! appended to the error queue by [`Backend::throw_error`], and the action
//! resolves normally. Actions that callers may want to branch on also
//! return the queued error.

use std::sync::{Arc, Weak};

use chrono::{DateTime, NaiveDate, Utc};
use tickbook_domain::{
    Activity, AuthCredential, ConnectorError, NewTask, Task, TimelineBlock, UserProfile,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::in_flight::InFlightGuard;
use super::state::SessionStatus;
use super::{Backend, BackendInner};

impl Backend {
    // ------------------------------------------------------------------
    // Error queue
    // ------------------------------------------------------------------

    /// Log `err` and append it to the error queue
    pub fn throw_error(&self, err: ConnectorError) -> Arc<ConnectorError> {
        self.throw_error_with(err, |_| {})
    }

    /// Like [`throw_error`](Self::throw_error), then hand the queued error
    /// to `done`
    pub fn throw_error_with<F>(&self, err: ConnectorError, done: F) -> Arc<ConnectorError>
    where
        F: FnOnce(&Arc<ConnectorError>),
    {
        log_connector_error(&err);

        let err = Arc::new(err);
        let queued = Arc::clone(&err);
        self.inner.channel.commit(move |state| state.errors.push(queued));
        self.schedule_auto_dismiss(&err);

        done(&err);
        err
    }

    /// Remove `err` from the queue; identity, not equality, decides
    pub fn dismiss_error(&self, err: &Arc<ConnectorError>) -> bool {
        self.inner.channel.commit_if(|state| {
            match state.errors.iter().position(|queued| Arc::ptr_eq(queued, err)) {
                Some(index) => {
                    state.errors.remove(index);
                    true
                }
                None => false,
            }
        })
    }

    /// Remove the oldest queued error carrying `id`
    ///
    /// Clones of one error share its id, so only the first match goes.
    pub fn dismiss_error_by_id(&self, id: Uuid) -> bool {
        self.inner.channel.commit_if(|state| {
            match state.errors.iter().position(|queued| queued.id() == id) {
                Some(index) => {
                    state.errors.remove(index);
                    true
                }
                None => false,
            }
        })
    }

    fn schedule_auto_dismiss(&self, err: &Arc<ConnectorError>) {
        let Some(after) = self.inner.auto_dismiss else {
            return;
        };

        match Handle::try_current() {
            Ok(runtime) => {
                let inner: Weak<BackendInner> = Arc::downgrade(&self.inner);
                let err = Arc::clone(err);
                runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    if let Some(inner) = inner.upgrade() {
                        Backend { inner }.dismiss_error(&err);
                    }
                });
            }
            Err(_) => {
                warn!(error_id = %err.id(), "Skipping auto-dismiss: no active Tokio runtime detected");
            }
        }
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Authenticate against the connector
    ///
    /// On success the session, credential and profile are committed
    /// together. On failure the session falls back to logged out with no
    /// leftover credential, and the queued error is returned.
    #[instrument(skip(self, auth), fields(identifier = %auth.identifier))]
    pub async fn login(&self, auth: AuthCredential) -> Result<UserProfile, Arc<ConnectorError>> {
        self.inner.channel.commit(|state| state.session = SessionStatus::AttemptingLogin);
        debug!(host = %auth.host, "Logging in");

        match self.inner.connector.login(&auth).await {
            Ok(user) => {
                info!(user_id = %user.id, connector = self.connector_name(), "Logged in");
                let profile = user.clone();
                self.inner.channel.commit(move |state| {
                    state.session = SessionStatus::LoggedIn;
                    state.auth = auth;
                    state.user = profile;
                });
                Ok(user)
            }
            Err(err) => {
                self.inner.channel.commit(|state| {
                    state.session = SessionStatus::LoggedOut;
                    state.auth = AuthCredential::default();
                    state.user = UserProfile::default();
                });
                Err(self.throw_error(err))
            }
        }
    }

    /// Forget the session and everything loaded for it
    ///
    /// The selected day and the error queue survive.
    pub fn logout(&self) {
        self.inner.channel.commit(|state| {
            state.session = SessionStatus::LoggedOut;
            state.auth = AuthCredential::default();
            state.user = UserProfile::default();
            state.tasks.clear();
            state.activities.clear();
            state.projects.clear();
            state.timeline.clear();
        });
        info!("Logged out");
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Reload projects, activities and tasks
    ///
    /// The three reads run concurrently and land in one commit; if any of
    /// them fails nothing is replaced and one error is queued.
    pub async fn list_tasks(&self) {
        let _ = self.refresh_lists().await;
    }

    pub(crate) async fn refresh_lists(&self) -> Result<(), Arc<ConnectorError>> {
        let user_id = self.current_user_id();
        let connector = &self.inner.connector;

        let loaded = tokio::try_join!(
            connector.list_projects(),
            connector.list_activities(),
            connector.list_tasks(&user_id),
        );

        match loaded {
            Ok((projects, activities, tasks)) => {
                debug!(
                    projects = projects.len(),
                    activities = activities.len(),
                    tasks = tasks.len(),
                    "Task lists refreshed"
                );
                self.inner.channel.commit(move |state| {
                    state.projects = projects;
                    state.activities = activities;
                    state.tasks = tasks;
                });
                Ok(())
            }
            Err(err) => Err(self.throw_error(err)),
        }
    }

    /// Start booking time on `task` for `activity`
    ///
    /// Resolves after the connector call and the follow-up refresh.
    #[instrument(skip(self, task, activity), fields(task_id = %task.id, activity_id = %activity.id))]
    pub async fn start_task(&self, task: &Task, activity: &Activity) {
        let Some(_guard) = self.claim_task(task, "start") else {
            return;
        };

        let timestamp = self.now();
        let user_id = self.current_user_id();
        match self.inner.connector.start_task(task, activity, timestamp, &user_id).await {
            Ok(()) => {
                info!(%timestamp, "Task started");
                self.list_tasks().await;
            }
            Err(err) => {
                self.throw_error(err);
            }
        }
    }

    /// Stop the running interval of `task`
    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub async fn stop_task(&self, task: &Task) {
        let Some(_guard) = self.claim_task(task, "stop") else {
            return;
        };

        let timestamp = self.now();
        let user_id = self.current_user_id();
        match self.inner.connector.stop_task(task, timestamp, &user_id).await {
            Ok(()) => {
                info!(%timestamp, "Task stopped");
                self.list_tasks().await;
            }
            Err(err) => {
                self.throw_error(err);
            }
        }
    }

    /// Create a task, then refresh the lists so it shows up
    #[instrument(skip(self, task), fields(label = %task.label))]
    pub async fn new_task(&self, task: NewTask) {
        match self.inner.connector.new_task(&task).await {
            Ok(()) => {
                info!("Task created");
                self.list_tasks().await;
            }
            Err(err) => {
                self.throw_error(err);
            }
        }
    }

    fn claim_task(&self, task: &Task, action: &str) -> Option<InFlightGuard> {
        let guard = self.inner.in_flight.claim(&task.id);
        if guard.is_none() {
            self.throw_error(ConnectorError::invalid_operation(format!(
                "Cannot {action} '{}' while another start or stop for it is in progress",
                task.label
            )));
        }
        guard
    }

    // ------------------------------------------------------------------
    // Timeline
    // ------------------------------------------------------------------

    /// Load the blocks of `date` (the selected day when `None`)
    ///
    /// The blocks and the day are committed together. Failures are queued
    /// and also returned.
    #[instrument(skip(self))]
    pub async fn list_day_timeline(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<(), Arc<ConnectorError>> {
        let (date, tasks) =
            self.inner.channel.read(|state| (date.unwrap_or(state.day), state.tasks.clone()));

        match self.inner.connector.list_day_timeline(date, &tasks).await {
            Ok(blocks) => {
                debug!(%date, blocks = blocks.len(), "Timeline loaded");
                self.inner.channel.commit(move |state| {
                    state.timeline = blocks;
                    state.day = date;
                });
                Ok(())
            }
            Err(err) => Err(self.throw_error(err)),
        }
    }

    /// Switch the timeline to `date`
    pub async fn set_current_date(&self, date: NaiveDate) {
        let _ = self.list_day_timeline(Some(date)).await;
    }

    /// Move the end of one block locally; nothing is persisted
    ///
    /// Returns false (and notifies nobody) when no block has that id.
    pub fn update_active_timeline_block(&self, block_id: &str, time: DateTime<Utc>) -> bool {
        self.inner.channel.commit_if(|state| {
            match state.timeline.iter_mut().find(|block| block.id == block_id) {
                Some(block) if block.end != time => {
                    block.end = time;
                    true
                }
                _ => false,
            }
        })
    }

    /// Apply an edited block immediately, then persist it in the background
    ///
    /// The optimistic replacement is committed before this returns. The
    /// returned handle resolves once the server round trip and the two
    /// follow-up reloads are done, which is when the timeline reflects the
    /// server's truth again. Returns `None` without any network call when
    /// no block carries `item.id`.
    pub fn update_timeline_block(&self, item: TimelineBlock) -> Option<JoinHandle<()>> {
        let optimistic = item.clone();
        let replaced = self.inner.channel.commit_if(move |state| {
            match state.timeline.iter_mut().find(|block| block.id == optimistic.id) {
                Some(slot) => {
                    *slot = optimistic;
                    true
                }
                None => false,
            }
        });

        if !replaced {
            debug!(block_id = %item.id, "Ignoring edit of a block that is not on the timeline");
            return None;
        }

        match Handle::try_current() {
            Ok(runtime) => {
                let backend = self.clone();
                Some(runtime.spawn(async move { backend.persist_timeline_block(item).await }))
            }
            Err(_) => {
                self.throw_error(ConnectorError::not_ready(
                    "Timeline edit could not be saved: no async runtime is running",
                ));
                None
            }
        }
    }

    async fn persist_timeline_block(&self, item: TimelineBlock) {
        match self.inner.connector.update_timeline_item(&item).await {
            Ok(saved) => debug!(block_id = %saved.id, "Timeline block saved"),
            Err(err) => {
                self.throw_error(err);
            }
        }

        // Reconcile with the server even when the save failed.
        self.list_tasks().await;
        let _ = self.list_day_timeline(None).await;
    }

    fn current_user_id(&self) -> String {
        self.inner.channel.read(|state| state.user.id.clone())
    }
}

fn log_connector_error(err: &ConnectorError) {
    error!(
        error_id = %err.id(),
        kind = %err.kind(),
        severity = %err.severity(),
        "Error in backend call: {}",
        err.message()
    );

    if let Some(info) = err.info() {
        for message in &info.server_messages {
            error!(error_id = %err.id(), "Server message: {message}");
        }
        for trace in &info.remote_trace {
            error!(error_id = %err.id(), "Remote trace:\n{}", trace.join("\n"));
        }
    }

    if let Some(cause) = err.original() {
        error!(error_id = %err.id(), "Caused by: {cause}");
    }
}
