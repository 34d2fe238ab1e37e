//! Domain service for the show catalog.
//!
//! Every mutation runs under one operation lock and one transaction scope,
//! so the show record, its team rows, and the derived key creatives text
//! move together.

use crate::db::repositories::ReplaceSummary;
use crate::dictionary::ResolvedName;
use crate::domain::{ShowId, ShowRef};
use crate::error::CatalogError;
use crate::models::{Show, ShowDraft, ShowPatch, TeamMember, TeamMemberInput};

/// Catalog operations used by the CLI and any future front end.
///
/// # Examples
///
/// ```rust,ignore
/// use showtrack::services::CatalogService;
/// use showtrack::models::ShowDraft;
/// use std::sync::Arc;
///
/// async fn example(
///     service: Arc<dyn CatalogService>,
/// ) -> Result<(), showtrack::error::CatalogError> {
///     let draft = ShowDraft::new("The Bear", "FX", &["FX Productions"]);
///     let id = service.create_show(draft).await?;
///     let _show = service.get_show(id).await?;
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a show, its team, and its key creatives text.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for blank required fields, duplicate
    ///   titles, bad dates, or members without roles
    /// - [`CatalogError::DuplicateName`] for repeated member names
    ///
    /// Failures are wrapped in [`CatalogError::StepFailed`] naming the step.
    async fn create_show(&self, draft: ShowDraft) -> Result<ShowId, CatalogError>;

    /// Applies `patch` to an existing show. A title change is a rename; a
    /// present team replaces the stored one.
    ///
    /// # Errors
    ///
    /// As [`CatalogService::create_show`], plus [`CatalogError::NotFound`].
    async fn update_show(&self, id: ShowId, patch: ShowPatch) -> Result<Show, CatalogError>;

    /// Changes only the display title.
    async fn rename_show(&self, id: ShowId, new_title: &str) -> Result<Show, CatalogError>;

    async fn search_shows(&self, query: &str) -> Result<Vec<Show>, CatalogError>;

    async fn get_show(&self, id: ShowId) -> Result<Show, CatalogError>;

    async fn list_shows(&self) -> Result<Vec<Show>, CatalogError>;

    /// Removes the show and its team rows.
    async fn delete_show(&self, id: ShowId) -> Result<(), CatalogError>;

    /// Team of the show sorted by listing order.
    async fn list_team(&self, show: &ShowRef) -> Result<Vec<TeamMember>, CatalogError>;

    /// Adds a member and returns the updated team.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateName`] when a member with the same name
    /// (case-insensitive) exists.
    async fn add_team_member(
        &self,
        show: &ShowRef,
        member: TeamMemberInput,
    ) -> Result<Vec<TeamMember>, CatalogError>;

    async fn remove_team_member(
        &self,
        show: &ShowRef,
        name: &str,
    ) -> Result<Vec<TeamMember>, CatalogError>;

    async fn add_role(
        &self,
        show: &ShowRef,
        name: &str,
        role: &str,
    ) -> Result<Vec<TeamMember>, CatalogError>;

    /// Removes a role; removing a member's last role removes the member.
    async fn remove_role(
        &self,
        show: &ShowRef,
        name: &str,
        role: &str,
    ) -> Result<Vec<TeamMember>, CatalogError>;

    /// Replaces the whole team of a show.
    async fn replace_team(
        &self,
        show: &ShowRef,
        members: Vec<TeamMemberInput>,
    ) -> Result<ReplaceSummary, CatalogError>;

    /// Checks that the stored key creatives text matches the team.
    ///
    /// # Errors
    ///
    /// [`CatalogError::SyncInconsistency`] on divergence.
    async fn verify_show(&self, id: ShowId) -> Result<(), CatalogError>;

    /// Verifies every show and returns the divergences found.
    async fn audit(&self) -> Result<Vec<CatalogError>, CatalogError>;

    /// Re-projects every show. Returns how many stored values changed.
    async fn resync_all(&self) -> Result<usize, CatalogError>;

    /// Resolution preview for a comma-separated studio list.
    fn resolve_studios(&self, input: &str) -> Vec<ResolvedName>;

    /// Resolution preview for a comma-separated role list.
    fn resolve_roles(&self, input: &str) -> Vec<ResolvedName>;
}
