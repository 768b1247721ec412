//! Team registry
//!
//! Owns two structures in the key-value store:
//! - `teams:{team_id}`: one hash per team record
//! - `team_names`: hash from team name to team id (the name index)
//!
//! Cross-key consistency rules:
//! - A name is claimed in the index with HSETNX *before* its record is
//!   written. Concurrent creates for one name therefore race on a single
//!   atomic primitive, and a failed create can never leave a record that is
//!   unreachable by name.
//! - Renames and deletes write the record change and the index change in one
//!   atomic batch.
//! - Residual windows: a crash between claiming a name and writing the
//!   record leaves a dangling index entry; updates are read-modify-write with
//!   last-write-wins, so an update racing a delete can write the record back.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::repositories::{KeyValueStore, WriteOp};

use super::patch::TeamPatch;
use super::team::{fields, NewTeam, Team};
use super::value_objects::TeamId;

/// Key of the name index hash
pub const NAME_INDEX_KEY: &str = "team_names";

/// Prefix shared by every team record key
pub const RECORD_KEY_PREFIX: &str = "teams:";

/// Message returned alongside the existing id on a duplicate create
pub const TEAM_EXISTS_MESSAGE: &str = "Team already exists";

const MAX_CLAIM_ATTEMPTS: usize = 3;

fn record_key(team_id: &TeamId) -> String {
    format!("{}{}", RECORD_KEY_PREFIX, team_id)
}

/// Result of a create request
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new team was stored
    Created(Team),
    /// The name is already registered; nothing was written
    Exists { team_id: TeamId },
}

/// One entry of the name index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamNameEntry {
    pub team_name: String,
    pub team_id: TeamId,
}

enum Claim {
    Claimed,
    HeldBy(TeamId),
}

/// Registry of team records and their name index
///
/// The backing store is injected at construction; the registry holds no
/// state of its own and can be shared freely between request handlers.
pub struct TeamRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl TeamRegistry {
    /// Creates a registry on top of the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Creates a team unless its name is already registered
    ///
    /// # Returns
    /// * `Ok(CreateOutcome::Created)` - New team with a generated id
    /// * `Ok(CreateOutcome::Exists)` - Name already taken; carries its id
    /// * `Err(RegistryError)` - Validation or store failure
    pub async fn create_team(&self, draft: NewTeam) -> RegistryResult<CreateOutcome> {
        let team = Team::new(draft)?;
        let team_id = team.team_id().clone();
        let name = team.team_name().to_string();

        if let Claim::HeldBy(existing) = self.claim_name(&name, &team_id).await? {
            if !self.store.exists(&record_key(&existing)).await? {
                warn!(
                    team_name = %name,
                    team_id = %existing,
                    "Name index entry points at a missing team record"
                );
            }
            return Ok(CreateOutcome::Exists { team_id: existing });
        }

        if let Err(e) = self
            .store
            .hset_all(&record_key(&team_id), &team.to_hash_fields())
            .await
        {
            self.release_name(&name, &team_id).await;
            return Err(e.into());
        }

        info!(team_id = %team_id, team_name = %name, "Team created");
        Ok(CreateOutcome::Created(team))
    }

    /// Fetches a team by id
    pub async fn get_team(&self, team_id: &TeamId) -> RegistryResult<Team> {
        let hash = self.store.hgetall(&record_key(team_id)).await?;
        if hash.is_empty() {
            return Err(RegistryError::NotFound(team_id.clone()));
        }

        Team::from_hash_fields(team_id.clone(), &hash).map_err(|source| {
            RegistryError::CorruptRecord {
                team_id: team_id.clone(),
                source,
            }
        })
    }

    /// Applies a partial update to a team
    ///
    /// A changed `team_name` migrates the index entry: the new name is
    /// claimed first (failing with `NameTaken` if another team holds it),
    /// then the record and the removal of the old entry are written
    /// atomically.
    pub async fn update_team(&self, team_id: &TeamId, patch: TeamPatch) -> RegistryResult<Team> {
        let mut team = self.get_team(team_id).await?;
        if patch.is_empty() {
            return Ok(team);
        }
        let old_name = team.team_name().to_string();

        team.apply(patch)?;
        let key = record_key(team_id);
        let fields = team.to_hash_fields();

        if team.team_name() == old_name {
            self.store.hset_all(&key, &fields).await?;
            info!(team_id = %team_id, "Team updated");
            return Ok(team);
        }

        // Every read happens before the claim; once the new name is held,
        // the only remaining step is the batch, which releases it on failure.
        let owns_old_name = self.index_points_at(&old_name, team_id).await?;

        let new_name = team.team_name().to_string();
        if let Claim::HeldBy(holder) = self.claim_name(&new_name, team_id).await? {
            if &holder != team_id {
                return Err(RegistryError::NameTaken {
                    name: new_name,
                    team_id: holder,
                });
            }
        }

        let mut ops = vec![WriteOp::SetFields { key, fields }];
        if owns_old_name {
            ops.push(WriteOp::DeleteField {
                key: NAME_INDEX_KEY.to_string(),
                field: old_name.clone(),
            });
        }

        if let Err(e) = self.store.atomic(ops).await {
            self.release_name(&new_name, team_id).await;
            return Err(e.into());
        }

        info!(
            team_id = %team_id,
            old_name = %old_name,
            new_name = %new_name,
            "Team renamed"
        );
        Ok(team)
    }

    /// Deletes a team and its name index entry
    ///
    /// The index entry is found through the record's own name, so no scan
    /// of the index is needed. The raw hash is read rather than a decoded
    /// team so that a malformed record can still be removed.
    pub async fn delete_team(&self, team_id: &TeamId) -> RegistryResult<()> {
        let key = record_key(team_id);
        let hash = self.store.hgetall(&key).await?;
        if hash.is_empty() {
            return Err(RegistryError::NotFound(team_id.clone()));
        }

        let name = hash.get(fields::TEAM_NAME).map(String::as_str).unwrap_or_default();

        let mut ops = vec![WriteOp::DeleteKey { key }];
        if name.is_empty() {
            warn!(team_id = %team_id, "Deleting team record without a name");
        } else if self.index_points_at(name, team_id).await? {
            ops.push(WriteOp::DeleteField {
                key: NAME_INDEX_KEY.to_string(),
                field: name.to_string(),
            });
        } else {
            warn!(
                team_id = %team_id,
                team_name = %name,
                "Name index entry does not point at the deleted team, leaving it in place"
            );
        }

        self.store.atomic(ops).await?;

        info!(team_id = %team_id, team_name = %name, "Team deleted");
        Ok(())
    }

    /// Lists every stored team, ordered by name
    ///
    /// Records deleted between enumeration and read are skipped, as are
    /// records that cannot be decoded (logged at WARN).
    pub async fn list_teams(&self) -> RegistryResult<Vec<Team>> {
        let keys = self.store.scan_prefix(RECORD_KEY_PREFIX).await?;

        let mut teams = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(raw_id) = key.strip_prefix(RECORD_KEY_PREFIX) else {
                continue;
            };
            let Ok(team_id) = TeamId::parse(raw_id) else {
                continue;
            };

            match self.get_team(&team_id).await {
                Ok(team) => teams.push(team),
                Err(RegistryError::NotFound(_)) => continue,
                Err(RegistryError::CorruptRecord { team_id, source }) => {
                    warn!(team_id = %team_id, error = %source, "Skipping unreadable team record");
                }
                Err(e) => return Err(e),
            }
        }

        teams.sort_by(|a, b| a.team_name().cmp(b.team_name()));
        Ok(teams)
    }

    /// Lists the name index, ordered by name
    pub async fn list_team_names(&self) -> RegistryResult<Vec<TeamNameEntry>> {
        let index = self.store.hgetall(NAME_INDEX_KEY).await?;

        let mut entries: Vec<TeamNameEntry> = index
            .into_iter()
            .filter_map(|(team_name, raw_id)| {
                TeamId::parse(raw_id)
                    .ok()
                    .map(|team_id| TeamNameEntry { team_name, team_id })
            })
            .collect();

        entries.sort_by(|a, b| a.team_name.cmp(&b.team_name));
        Ok(entries)
    }

    /// Claims `name` for `team_id` in the index
    ///
    /// Retries when the holder disappears between the failed claim and the
    /// read-back.
    async fn claim_name(&self, name: &str, team_id: &TeamId) -> RegistryResult<Claim> {
        for _ in 0..MAX_CLAIM_ATTEMPTS {
            if self
                .store
                .hset_nx(NAME_INDEX_KEY, name, team_id.as_str())
                .await?
            {
                return Ok(Claim::Claimed);
            }

            if let Some(holder) = self.store.hget(NAME_INDEX_KEY, name).await? {
                if let Ok(holder) = TeamId::parse(holder) {
                    return Ok(Claim::HeldBy(holder));
                }
            }
        }

        Err(RegistryError::NameContention(name.to_string()))
    }

    async fn index_points_at(&self, name: &str, team_id: &TeamId) -> RegistryResult<bool> {
        let holder = self.store.hget(NAME_INDEX_KEY, name).await?;
        Ok(holder.as_deref() == Some(team_id.as_str()))
    }

    /// Best-effort rollback of a claim after a failed record write
    async fn release_name(&self, name: &str, team_id: &TeamId) {
        let released = match self.index_points_at(name, team_id).await {
            Ok(true) => self.store.hdel(NAME_INDEX_KEY, name).await.map(|_| ()),
            Ok(false) => Ok(()),
            Err(RegistryError::StoreUnavailable(e)) => Err(e),
            Err(_) => Ok(()),
        };

        match released {
            Ok(()) => warn!(team_id = %team_id, team_name = %name, "Released name claim"),
            Err(e) => warn!(
                team_id = %team_id,
                team_name = %name,
                error = %e,
                "Could not release name claim, index entry is now dangling"
            ),
        }
    }
}
