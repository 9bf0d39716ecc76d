use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::clients::{GitHubClient, SlackClient};
use crate::core::models::{GitHubUser, Organization, Repository, Team};
use crate::errors::AppError;
use crate::storage::DocumentStore;

/// Counts from one completed synchronization cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub organization: String,
    pub users: usize,
    pub repositories: usize,
    pub teams: usize,
}

/// Where failed cycles are announced, if anywhere.
#[derive(Debug, Clone)]
pub struct FailureNotifier {
    pub slack: SlackClient,
    pub channel_id: String,
}

/// Full re-pull of the organization into the document store.
#[derive(Debug, Clone)]
pub struct SyncJob {
    github: GitHubClient,
    store: DocumentStore,
    permits: Arc<Semaphore>,
    notifier: Option<FailureNotifier>,
}

/// Spawns every task, at most `permits` running at once, and joins them.
/// The first error is returned; tasks already spawned keep running.
async fn fan_out<T, Fut>(permits: &Arc<Semaphore>, tasks: Vec<Fut>) -> Result<Vec<T>, AppError>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let permits = Arc::clone(permits);
            tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Internal(format!("Sync semaphore closed: {e}")))?;
                task.await
            })
        })
        .collect();

    try_join_all(handles.into_iter().map(|handle| async move {
        handle
            .await
            .map_err(|e| AppError::Internal(format!("Sync task failed to complete: {e}")))?
    }))
    .await
}

async fn sync_user(github: GitHubClient, store: DocumentStore, login: String) -> Result<(), AppError> {
    let profile = github.get_user(&login).await?;
    store.save_user(&GitHubUser::from(&profile)).await
}

impl SyncJob {
    #[must_use]
    pub fn new(github: GitHubClient, store: DocumentStore, concurrency: usize) -> Self {
        Self {
            github,
            store,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            notifier: None,
        }
    }

    #[must_use]
    pub fn with_failure_notifier(mut self, notifier: FailureNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Runs one cycle: organization, members, repositories, then teams with
    /// their members and repository names.
    ///
    /// # Errors
    ///
    /// The first failing fetch or upsert aborts the cycle.
    pub async fn run_once(&self) -> Result<SyncReport, AppError> {
        let org = self.github.organization().to_string();
        info!(org = %org, "Starting GitHub synchronization");

        let profile = self.github.get_organization().await?;
        self.store
            .save_organization(&Organization::from(&profile))
            .await?;

        let members = self.github.list_members().await?;
        let mut synced: HashSet<String> = members.iter().map(|m| m.login.clone()).collect();
        let user_tasks = members
            .into_iter()
            .map(|m| sync_user(self.github.clone(), self.store.clone(), m.login))
            .collect();
        fan_out(&self.permits, user_tasks).await?;

        let repos = self.github.list_repositories().await?;
        for summary in &repos {
            self.store
                .save_repository(&Repository::from_summary(summary, &org))
                .await?;
        }

        let teams = self.github.list_teams().await?;
        let team_tasks = teams
            .iter()
            .map(|summary| {
                let github = self.github.clone();
                let team = Team::from_summary(summary, &org);
                let team_id = summary.id;
                async move {
                    let members = github.get_team_members(team_id).await?;
                    let repositories = github.get_team_repositories(team_id).await?;
                    Ok::<_, AppError>((team, members, repositories))
                }
            })
            .collect();
        let team_results = fan_out(&self.permits, team_tasks).await?;

        let mut extra_users = Vec::new();
        for (mut team, members, repositories) in team_results {
            for member in &members {
                if synced.insert(member.login.clone()) {
                    extra_users.push(member.login.clone());
                }
            }
            team.members = members.into_iter().map(|m| m.login).collect();
            team.repositories = repositories;
            self.store.save_team(&team).await?;
        }

        let extra_tasks = extra_users
            .into_iter()
            .map(|login| sync_user(self.github.clone(), self.store.clone(), login))
            .collect();
        fan_out(&self.permits, extra_tasks).await?;

        let report = SyncReport {
            organization: profile.login,
            users: synced.len(),
            repositories: repos.len(),
            teams: teams.len(),
        };
        info!(
            org = %report.organization,
            users = report.users,
            repositories = report.repositories,
            teams = report.teams,
            "GitHub synchronization finished"
        );
        Ok(report)
    }

    /// Runs a cycle immediately and then once per `period`. Failures are
    /// logged and the loop carries on.
    pub async fn run_forever(&self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once().await {
                error!(kind = ?e.kind(), "GitHub synchronization failed: {}", e);
                self.notify_failure(&e).await;
            }
        }
    }

    async fn notify_failure(&self, err: &AppError) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let text = format!(
            "GitHub synchronization for {} failed: {}",
            self.github.organization(),
            err.message()
        );
        if let Err(e) = notifier.slack.post_message(&notifier.channel_id, &text).await {
            warn!("Failed to post sync failure to Slack: {}", e);
        }
    }
}
