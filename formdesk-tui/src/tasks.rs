//! Background network work.
//!
//! The app never awaits the network itself. It emits `Command`s, the
//! `TaskRunner` turns each into a spawned task, and every task reports back
//! through the event channel as a `TaskResult`.

use crate::api_client::{RestClient, UserProfile};
use crate::events::TuiEvent;
use formdesk_core::{DateRange, FetchTicket, FormMode, Record, RecordId, Resource};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Side effects requested by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load a screen's collection.
    Fetch {
        resource: Resource,
        ticket: FetchTicket,
        range: Option<DateRange>,
    },
    /// Load lookup data (user names, leave types) independent of any screen.
    FetchReference(Resource),
    /// Abort the in-flight fetch for a screen.
    CancelFetch(Resource),
    Save {
        resource: Resource,
        mode: FormMode,
        body: Value,
    },
    Delete {
        resource: Resource,
        id: RecordId,
    },
    LoadProfile(RecordId),
}

/// A user profile with its signature resolved to a full URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub signature_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    Fetched {
        resource: Resource,
        ticket: FetchTicket,
        result: Result<Vec<Record>, String>,
    },
    Reference {
        resource: Resource,
        result: Result<Vec<Record>, String>,
    },
    Saved {
        resource: Resource,
        mode: FormMode,
        result: Result<Record, String>,
    },
    Deleted {
        resource: Resource,
        id: RecordId,
        result: Result<(), String>,
    },
    Profile {
        user_id: RecordId,
        result: Result<ResolvedProfile, String>,
    },
}

/// Spawns tasks and keeps one fetch handle per screen.
pub struct TaskRunner {
    client: RestClient,
    sender: mpsc::Sender<TuiEvent>,
    fetches: HashMap<Resource, JoinHandle<()>>,
}

impl TaskRunner {
    pub fn new(client: RestClient, sender: mpsc::Sender<TuiEvent>) -> Self {
        Self {
            client,
            sender,
            fetches: HashMap::new(),
        }
    }

    pub fn run_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.run(command);
        }
    }

    pub fn run(&mut self, command: Command) {
        match command {
            Command::Fetch {
                resource,
                ticket,
                range,
            } => {
                self.abort(resource);
                let handle = spawn_fetch(
                    self.client.clone(),
                    resource,
                    ticket,
                    range,
                    self.sender.clone(),
                );
                self.fetches.insert(resource, handle);
            }
            Command::FetchReference(resource) => {
                spawn_reference(self.client.clone(), resource, self.sender.clone());
            }
            Command::CancelFetch(resource) => self.abort(resource),
            Command::Save {
                resource,
                mode,
                body,
            } => {
                spawn_save(self.client.clone(), resource, mode, body, self.sender.clone());
            }
            Command::Delete { resource, id } => {
                spawn_delete(self.client.clone(), resource, id, self.sender.clone());
            }
            Command::LoadProfile(user_id) => {
                spawn_profile(self.client.clone(), user_id, self.sender.clone());
            }
        }
    }

    fn abort(&mut self, resource: Resource) {
        if let Some(handle) = self.fetches.remove(&resource) {
            if !handle.is_finished() {
                tracing::debug!(resource = resource.path(), "Aborting in-flight fetch");
                handle.abort();
            }
        }
    }
}

async fn report(sender: &mpsc::Sender<TuiEvent>, result: TaskResult) {
    if sender.send(TuiEvent::Task(Box::new(result))).await.is_err() {
        tracing::debug!("Event channel closed; dropping task result");
    }
}

pub fn spawn_fetch(
    client: RestClient,
    resource: Resource,
    ticket: FetchTicket,
    range: Option<DateRange>,
    sender: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(
            resource = resource.path(),
            generation = ticket.generation(),
            "Fetching collection"
        );
        let result = client.list(resource, range.as_ref()).await;
        match &result {
            Ok(records) => tracing::info!(
                resource = resource.path(),
                count = records.len(),
                "Fetched collection"
            ),
            Err(err) => tracing::warn!(resource = resource.path(), error = %err, "Fetch failed"),
        }
        let result = result.map_err(|err| err.to_string());
        report(
            &sender,
            TaskResult::Fetched {
                resource,
                ticket,
                result,
            },
        )
        .await;
    })
}

pub fn spawn_reference(
    client: RestClient,
    resource: Resource,
    sender: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = client.list(resource, None).await.map_err(|err| {
            tracing::warn!(resource = resource.path(), error = %err, "Reference fetch failed");
            err.to_string()
        });
        report(&sender, TaskResult::Reference { resource, result }).await;
    })
}

pub fn spawn_save(
    client: RestClient,
    resource: Resource,
    mode: FormMode,
    body: Value,
    sender: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match &mode {
            FormMode::Create => client.create(resource, &body).await,
            FormMode::Edit(id) => client.update(resource, id, &body).await,
        };
        match &result {
            Ok(record) => tracing::info!(
                resource = resource.path(),
                id = %record.id(),
                action = mode.verb(),
                "Record saved"
            ),
            Err(err) => tracing::warn!(resource = resource.path(), error = %err, "Save failed"),
        }
        let result = result.map_err(|err| err.to_string());
        report(
            &sender,
            TaskResult::Saved {
                resource,
                mode,
                result,
            },
        )
        .await;
    })
}

pub fn spawn_delete(
    client: RestClient,
    resource: Resource,
    id: RecordId,
    sender: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = client.delete(resource, &id).await;
        match &result {
            Ok(()) => tracing::info!(resource = resource.path(), id = %id, "Record deleted"),
            Err(err) => tracing::warn!(resource = resource.path(), id = %id, error = %err, "Delete failed"),
        }
        let result = result.map_err(|err| err.to_string());
        report(&sender, TaskResult::Deleted { resource, id, result }).await;
    })
}

pub fn spawn_profile(
    client: RestClient,
    user_id: RecordId,
    sender: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = client
            .user_profile(&user_id)
            .await
            .map(|profile| resolve_profile(&client, profile))
            .map_err(|err| {
                tracing::warn!(user_id = %user_id, error = %err, "Profile lookup failed");
                err.to_string()
            });
        report(&sender, TaskResult::Profile { user_id, result }).await;
    })
}

fn resolve_profile(client: &RestClient, profile: UserProfile) -> ResolvedProfile {
    let signature_url = profile
        .signature
        .filter(|file| !file.trim().is_empty())
        .map(|file| client.signature_url(&file));
    ResolvedProfile {
        name: profile.name,
        signature_url,
    }
}
