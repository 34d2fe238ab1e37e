//! Row-store implementation of [`CatalogService`].

use crate::config::Config;
use crate::db::repositories::{ReplaceSummary, ShowRepository, TeamRepository};
use crate::dictionary::{NameResolver, ResolvedName};
use crate::domain::{ShowId, ShowRef, SyncStep};
use crate::error::{CatalogError, ErrorKind, Result};
use crate::models::show::require_text;
use crate::models::{Show, ShowDraft, ShowPatch, TeamMember, TeamMemberInput};
use crate::services::catalog_service::CatalogService;
use crate::services::projector::KeyCreativesProjector;
use crate::services::search::SearchIndex;
use crate::store::{RowStore, with_transaction};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// [`CatalogService`] over any [`RowStore`].
///
/// Operations are serialized by `op_lock`. Helpers below the trait methods
/// assume the lock is already held and never take it themselves.
pub struct RowStoreCatalogService {
    store: Arc<dyn RowStore>,
    resolver: Arc<NameResolver>,
    shows: Arc<ShowRepository>,
    team: Arc<TeamRepository>,
    projector: KeyCreativesProjector,
    op_lock: Mutex<()>,
}

impl RowStoreCatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, resolver: Arc<NameResolver>, config: &Config) -> Self {
        let shows = Arc::new(ShowRepository::new(
            store.clone(),
            resolver.clone(),
            SearchIndex::new(config.search),
        ));
        let team = Arc::new(TeamRepository::new(store.clone(), resolver.clone()));
        let projector = KeyCreativesProjector::new(
            shows.clone(),
            team.clone(),
            config.team.empty_sentinel.clone(),
        );

        Self {
            store,
            resolver,
            shows,
            team,
            projector,
            op_lock: Mutex::new(()),
        }
    }

    async fn in_transaction<'a, T: Send + 'a>(
        &'a self,
        work: BoxFuture<'a, Result<T>>,
    ) -> Result<T> {
        with_transaction(self.store.as_ref(), work).await
    }

    async fn resolve_ref(&self, show: &ShowRef) -> Result<ShowId> {
        match show {
            ShowRef::Id(id) => self.shows.get(*id).await.map(|s| s.id),
            ShowRef::Title(title) => self
                .shows
                .find_by_title(title)
                .await?
                .map(|s| s.id)
                .ok_or_else(|| CatalogError::show_not_found(title)),
        }
    }

    async fn create_show_inner(&self, draft: ShowDraft) -> Result<ShowId> {
        // Reject a bad team before anything is written.
        self.team
            .prepare_members(ShowId::new(), &draft.team)
            .map_err(at(SyncStep::ValidateInput))?;

        self.in_transaction(Box::pin(async {
            let show = self
                .shows
                .create(&draft)
                .await
                .map_err(at(SyncStep::WriteShow))?;
            if !draft.team.is_empty() {
                self.team
                    .replace_for_show(show.id, &draft.team)
                    .await
                    .map_err(at(SyncStep::SyncTeam))?;
            }
            self.projector
                .sync(show.id)
                .await
                .map_err(at(SyncStep::ProjectKeyCreatives))?;
            Ok(show.id)
        }))
        .await
    }

    async fn update_show_inner(&self, id: ShowId, patch: ShowPatch) -> Result<Show> {
        if let Some(title) = &patch.title {
            require_text("title", title).map_err(at(SyncStep::ValidateInput))?;
        }
        if let Some(team) = &patch.team {
            self.team
                .prepare_members(id, team)
                .map_err(at(SyncStep::ValidateInput))?;
        }

        self.in_transaction(Box::pin(async {
            if let Some(title) = &patch.title {
                self.shows
                    .rename(id, title)
                    .await
                    .map_err(at(SyncStep::WriteShow))?;
            }
            self.shows
                .update(id, &patch)
                .await
                .map_err(at(SyncStep::WriteShow))?;
            if let Some(team) = &patch.team {
                self.team
                    .replace_for_show(id, team)
                    .await
                    .map_err(at(SyncStep::SyncTeam))?;
            }
            self.projector
                .sync(id)
                .await
                .map_err(at(SyncStep::ProjectKeyCreatives))?;
            self.shows.get(id).await
        }))
        .await
    }

    async fn rename_show_inner(&self, id: ShowId, new_title: &str) -> Result<Show> {
        self.in_transaction(Box::pin(async {
            self.shows
                .rename(id, new_title)
                .await
                .map_err(at(SyncStep::WriteShow))
        }))
        .await
    }

    async fn delete_show_inner(&self, id: ShowId) -> Result<()> {
        self.in_transaction(Box::pin(async {
            let show = self.shows.get(id).await.map_err(at(SyncStep::DeleteShow))?;
            let members = self
                .team
                .delete_for_show(id)
                .await
                .map_err(at(SyncStep::DeleteShow))?;
            self.shows.delete(id).await.map_err(at(SyncStep::DeleteShow))?;
            info!(show = %id, title = %show.title, members, "Deleted show with team");
            Ok(())
        }))
        .await
    }

    /// Runs one team mutation and re-projects, returning the resulting team.
    async fn mutate_team<'a>(
        &'a self,
        show: &ShowRef,
        change: impl FnOnce(ShowId) -> BoxFuture<'a, Result<()>> + Send + 'a,
    ) -> Result<Vec<TeamMember>> {
        let id = self
            .resolve_ref(show)
            .await
            .map_err(at(SyncStep::ValidateInput))?;

        self.in_transaction(Box::pin(async move {
            change(id).await.map_err(at(SyncStep::SyncTeam))?;
            self.projector
                .sync(id)
                .await
                .map_err(at(SyncStep::ProjectKeyCreatives))?;
            Ok(())
        }))
        .await?;

        self.team.list_for_show(id).await
    }

    async fn replace_team_inner(
        &self,
        show: &ShowRef,
        members: Vec<TeamMemberInput>,
    ) -> Result<ReplaceSummary> {
        let id = self
            .resolve_ref(show)
            .await
            .map_err(at(SyncStep::ValidateInput))?;

        self.in_transaction(Box::pin(async {
            let summary = self
                .team
                .replace_for_show(id, &members)
                .await
                .map_err(at(SyncStep::SyncTeam))?;
            self.projector
                .sync(id)
                .await
                .map_err(at(SyncStep::ProjectKeyCreatives))?;
            Ok(summary)
        }))
        .await
    }

    async fn audit_inner(&self) -> Result<Vec<CatalogError>> {
        let mut divergences = Vec::new();
        for show in self.shows.list().await? {
            match self.projector.verify(show.id).await {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::SyncInconsistency => {
                    err.report();
                    divergences.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(divergences)
    }

    async fn resync_all_inner(&self) -> Result<usize> {
        let shows = self.shows.list().await?;
        let rewritten = self
            .in_transaction(Box::pin(async {
                let mut rewritten = 0;
                for show in &shows {
                    if self
                        .projector
                        .sync(show.id)
                        .await
                        .map_err(at(SyncStep::ProjectKeyCreatives))?
                    {
                        warn!(show = %show.id, title = %show.title, "Rewrote stale key creatives");
                        rewritten += 1;
                    }
                }
                Ok(rewritten)
            }))
            .await?;

        info!(shows = shows.len(), rewritten, "Resynced key creatives");
        Ok(rewritten)
    }
}

fn at(step: SyncStep) -> impl Fn(CatalogError) -> CatalogError {
    move |err| err.at_step(step)
}

#[async_trait::async_trait]
impl CatalogService for RowStoreCatalogService {
    async fn create_show(&self, draft: ShowDraft) -> Result<ShowId> {
        let _guard = self.op_lock.lock().await;
        self.create_show_inner(draft)
            .await
            .inspect_err(CatalogError::report)
    }

    async fn update_show(&self, id: ShowId, patch: ShowPatch) -> Result<Show> {
        let _guard = self.op_lock.lock().await;
        self.update_show_inner(id, patch)
            .await
            .inspect_err(CatalogError::report)
    }

    async fn rename_show(&self, id: ShowId, new_title: &str) -> Result<Show> {
        let _guard = self.op_lock.lock().await;
        self.rename_show_inner(id, new_title)
            .await
            .inspect_err(CatalogError::report)
    }

    async fn search_shows(&self, query: &str) -> Result<Vec<Show>> {
        let _guard = self.op_lock.lock().await;
        self.shows.search(query).await.inspect_err(CatalogError::report)
    }

    async fn get_show(&self, id: ShowId) -> Result<Show> {
        let _guard = self.op_lock.lock().await;
        self.shows.get(id).await.inspect_err(CatalogError::report)
    }

    async fn list_shows(&self) -> Result<Vec<Show>> {
        let _guard = self.op_lock.lock().await;
        self.shows.list().await.inspect_err(CatalogError::report)
    }

    async fn delete_show(&self, id: ShowId) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        self.delete_show_inner(id)
            .await
            .inspect_err(CatalogError::report)
    }

    async fn list_team(&self, show: &ShowRef) -> Result<Vec<TeamMember>> {
        let _guard = self.op_lock.lock().await;
        let result = match self.resolve_ref(show).await {
            Ok(id) => self.team.list_for_show(id).await,
            Err(err) => Err(err),
        };
        result.inspect_err(CatalogError::report)
    }

    async fn add_team_member(
        &self,
        show: &ShowRef,
        member: TeamMemberInput,
    ) -> Result<Vec<TeamMember>> {
        let _guard = self.op_lock.lock().await;
        let team = self.team.clone();
        self.mutate_team(show, move |id| {
            Box::pin(async move { team.add_member(id, &member).await.map(drop) })
        })
        .await
        .inspect_err(CatalogError::report)
    }

    async fn remove_team_member(&self, show: &ShowRef, name: &str) -> Result<Vec<TeamMember>> {
        let _guard = self.op_lock.lock().await;
        let team = self.team.clone();
        let name = name.to_string();
        self.mutate_team(show, move |id| {
            Box::pin(async move { team.remove_member(id, &name).await.map(drop) })
        })
        .await
        .inspect_err(CatalogError::report)
    }

    async fn add_role(&self, show: &ShowRef, name: &str, role: &str) -> Result<Vec<TeamMember>> {
        let _guard = self.op_lock.lock().await;
        let team = self.team.clone();
        let (name, role) = (name.to_string(), role.to_string());
        self.mutate_team(show, move |id| {
            Box::pin(async move { team.add_role(id, &name, &role).await.map(drop) })
        })
        .await
        .inspect_err(CatalogError::report)
    }

    async fn remove_role(
        &self,
        show: &ShowRef,
        name: &str,
        role: &str,
    ) -> Result<Vec<TeamMember>> {
        let _guard = self.op_lock.lock().await;
        let team = self.team.clone();
        let (name, role) = (name.to_string(), role.to_string());
        self.mutate_team(show, move |id| {
            Box::pin(async move { team.remove_role(id, &name, &role).await.map(drop) })
        })
        .await
        .inspect_err(CatalogError::report)
    }

    async fn replace_team(
        &self,
        show: &ShowRef,
        members: Vec<TeamMemberInput>,
    ) -> Result<ReplaceSummary> {
        let _guard = self.op_lock.lock().await;
        self.replace_team_inner(show, members)
            .await
            .inspect_err(CatalogError::report)
    }

    async fn verify_show(&self, id: ShowId) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        self.projector
            .verify(id)
            .await
            .inspect_err(CatalogError::report)
    }

    async fn audit(&self) -> Result<Vec<CatalogError>> {
        let _guard = self.op_lock.lock().await;
        self.audit_inner().await.inspect_err(CatalogError::report)
    }

    async fn resync_all(&self) -> Result<usize> {
        let _guard = self.op_lock.lock().await;
        self.resync_all_inner()
            .await
            .inspect_err(CatalogError::report)
    }

    fn resolve_studios(&self, input: &str) -> Vec<ResolvedName> {
        self.resolver.preview_studios(input)
    }

    fn resolve_roles(&self, input: &str) -> Vec<ResolvedName> {
        self.resolver.preview_roles(input)
    }
}
