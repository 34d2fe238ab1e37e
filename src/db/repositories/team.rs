use super::layout::TableLayout;
use crate::constants::{LIST_DELIMITER, LIST_JOINER, columns, tables};
use crate::dictionary::{NameResolver, normalize_key};
use crate::domain::ShowId;
use crate::error::{CatalogError, Result};
use crate::models::show::clean_optional;
use crate::models::{TeamMember, TeamMemberInput};
use crate::store::{Row, RowStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TABLE: &str = tables::TEAM;

/// Outcome counts of a [`TeamRepository::replace_for_show`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Row changes needed to turn a show's stored team into the desired one.
#[derive(Debug, Default)]
struct ReplacePlan {
    append: Vec<TeamMember>,
    overwrite: Vec<(usize, TeamMember)>,
    delete: Vec<usize>,
    unchanged: usize,
}

/// Team member records in the `team` table, keyed by show id.
pub struct TeamRepository {
    store: Arc<dyn RowStore>,
    resolver: Arc<NameResolver>,
}

impl TeamRepository {
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, resolver: Arc<NameResolver>) -> Self {
        Self { store, resolver }
    }

    async fn layout(&self) -> Result<TableLayout> {
        TableLayout::load(self.store.as_ref(), TABLE, columns::TEAM).await
    }

    fn row_to_member(layout: &TableLayout, row: &Row, show_id: ShowId) -> TeamMember {
        let order = match layout.get(row, "order") {
            "" => 0,
            raw => raw.parse().unwrap_or_else(|_| {
                warn!(show = %show_id, value = raw, "Treating unparsable team order as 0");
                0
            }),
        };

        TeamMember {
            show_id,
            name: layout.get(row, "name").to_string(),
            roles: layout
                .get(row, "roles")
                .split(LIST_DELIMITER)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(ToString::to_string)
                .collect(),
            order,
            notes: clean_optional(Some(layout.get(row, "notes").to_string())),
        }
    }

    fn member_to_row(layout: &TableLayout, member: &TeamMember, base: Option<Row>) -> Row {
        let mut row = base.unwrap_or_else(|| layout.blank_row());
        layout.set(&mut row, "show_id", member.show_id.to_string());
        layout.set(&mut row, "name", member.name.clone());
        layout.set(&mut row, "roles", member.roles.join(LIST_JOINER));
        layout.set(&mut row, "order", member.order.to_string());
        layout.set(&mut row, "notes", member.notes.clone().unwrap_or_default());
        row
    }

    /// The show's rows with their storage positions, in storage order.
    async fn rows_for_show(
        &self,
        show_id: ShowId,
    ) -> Result<(TableLayout, Vec<(usize, Row, TeamMember)>)> {
        let layout = self.layout().await?;
        let key = show_id.to_string();
        let rows = self.store.read_all(TABLE).await?;

        let members = rows
            .into_iter()
            .enumerate()
            .filter(|(_, row)| layout.get(row, "show_id").eq_ignore_ascii_case(&key))
            .map(|(position, row)| {
                let member = Self::row_to_member(&layout, &row, show_id);
                (position, row, member)
            })
            .collect();

        Ok((layout, members))
    }

    async fn find_member(
        &self,
        show_id: ShowId,
        name: &str,
    ) -> Result<(TableLayout, usize, Row, TeamMember)> {
        let (layout, rows) = self.rows_for_show(show_id).await?;
        rows.into_iter()
            .find(|(_, _, member)| member.has_name(name))
            .map(|(position, row, member)| (layout, position, row, member))
            .ok_or_else(|| CatalogError::member_not_found(show_id, name.trim()))
    }

    /// Members of the show sorted by `order`; equal orders keep storage order.
    pub async fn list_for_show(&self, show_id: ShowId) -> Result<Vec<TeamMember>> {
        let (_, rows) = self.rows_for_show(show_id).await?;
        let mut members: Vec<TeamMember> = rows.into_iter().map(|(_, _, m)| m).collect();
        members.sort_by_key(|m| m.order);
        Ok(members)
    }

    /// Resolves roles and assigns default orders for a full team list,
    /// rejecting blank or repeated names and members left without a role.
    pub fn prepare_members(
        &self,
        show_id: ShowId,
        inputs: &[TeamMemberInput],
    ) -> Result<Vec<TeamMember>> {
        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(inputs.len());

        for (idx, input) in inputs.iter().enumerate() {
            let member = self.prepare_member(show_id, input, default_order(idx))?;
            if !seen.insert(member.name.to_lowercase()) {
                return Err(CatalogError::DuplicateName {
                    show: show_id,
                    name: member.name,
                });
            }
            members.push(member);
        }

        Ok(members)
    }

    fn prepare_member(
        &self,
        show_id: ShowId,
        input: &TeamMemberInput,
        fallback_order: i32,
    ) -> Result<TeamMember> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CatalogError::validation("Team member name is required"));
        }

        let roles = self.resolver.role_labels(&input.roles);
        if roles.is_empty() {
            return Err(CatalogError::validation(format!(
                "Team member '{name}' needs at least one role"
            )));
        }

        Ok(TeamMember {
            show_id,
            name: name.to_string(),
            roles,
            order: input.order.unwrap_or(fallback_order),
            notes: clean_optional(input.notes.clone()),
        })
    }

    /// Makes the show's team exactly `inputs`.
    ///
    /// Applied as a diff: new members are appended first, changed rows
    /// overwritten in place, stale rows deleted last. Without a real
    /// transaction an interruption therefore leaves duplicates rather than
    /// gaps. Callers wrap this in a transaction scope when they have one.
    pub async fn replace_for_show(
        &self,
        show_id: ShowId,
        inputs: &[TeamMemberInput],
    ) -> Result<ReplaceSummary> {
        let desired = self.prepare_members(show_id, inputs)?;
        let (layout, existing) = self.rows_for_show(show_id).await?;

        let plan = plan_replacement(&existing, &desired);
        let summary = ReplaceSummary {
            added: plan.append.len(),
            updated: plan.overwrite.len(),
            removed: plan.delete.len(),
            unchanged: plan.unchanged,
        };

        for member in &plan.append {
            self.store
                .append_row(TABLE, Self::member_to_row(&layout, member, None))
                .await?;
        }

        for (position, member) in plan.overwrite {
            let base = existing
                .iter()
                .find(|(p, _, _)| *p == position)
                .map(|(_, row, _)| row.clone());
            self.store
                .write_row(TABLE, position, Self::member_to_row(&layout, &member, base))
                .await?;
        }

        let mut deletions = plan.delete;
        deletions.sort_unstable_by(|a, b| b.cmp(a));
        for position in deletions {
            self.store.delete_row(TABLE, position).await?;
        }

        info!(
            show = %show_id,
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            unchanged = summary.unchanged,
            "Replaced team"
        );
        Ok(summary)
    }

    /// Adds one member. Names are unique per show, case-insensitively.
    pub async fn add_member(&self, show_id: ShowId, input: &TeamMemberInput) -> Result<TeamMember> {
        let (layout, rows) = self.rows_for_show(show_id).await?;

        if let Some((_, _, existing)) = rows.iter().find(|(_, _, m)| m.has_name(&input.name)) {
            return Err(CatalogError::DuplicateName {
                show: show_id,
                name: existing.name.clone(),
            });
        }

        let next_order = rows.iter().map(|(_, _, m)| m.order).max().unwrap_or(0) + 1;
        let member = self.prepare_member(show_id, input, next_order)?;

        self.store
            .append_row(TABLE, Self::member_to_row(&layout, &member, None))
            .await?;

        info!(show = %show_id, name = %member.name, "Added team member");
        Ok(member)
    }

    pub async fn remove_member(&self, show_id: ShowId, name: &str) -> Result<TeamMember> {
        let (_, position, _, member) = self.find_member(show_id, name).await?;
        self.store.delete_row(TABLE, position).await?;
        info!(show = %show_id, name = %member.name, "Removed team member");
        Ok(member)
    }

    /// Adds `role` (resolved; may be a comma-joined list) to an existing
    /// member. Roles the member already holds are skipped.
    pub async fn add_role(&self, show_id: ShowId, name: &str, role: &str) -> Result<TeamMember> {
        let labels = self.resolver.role_labels(&[role]);
        if labels.is_empty() {
            return Err(CatalogError::validation("Role is required"));
        }

        let (layout, position, row, mut member) = self.find_member(show_id, name).await?;
        let added: Vec<String> = labels
            .into_iter()
            .filter(|label| !member.has_role(label))
            .collect();
        if added.is_empty() {
            debug!(
                show = %show_id,
                name = %member.name,
                role = role.trim(),
                "Role already present"
            );
            return Ok(member);
        }

        member.roles.extend(added);
        self.store
            .write_row(TABLE, position, Self::member_to_row(&layout, &member, Some(row)))
            .await?;

        info!(show = %show_id, name = %member.name, "Added role");
        Ok(member)
    }

    /// Removes `role` from a member. Taking away the last role deletes the
    /// member, since a member without roles is not a valid record; `None`
    /// is returned in that case.
    pub async fn remove_role(
        &self,
        show_id: ShowId,
        name: &str,
        role: &str,
    ) -> Result<Option<TeamMember>> {
        let labels = self.resolver.role_labels(&[role]);
        if labels.is_empty() {
            return Err(CatalogError::validation("Role is required"));
        }
        let (layout, position, row, mut member) = self.find_member(show_id, name).await?;

        let keys: Vec<String> = labels
            .iter()
            .map(String::as_str)
            .chain(role.split(LIST_DELIMITER))
            .map(normalize_key)
            .collect();
        let before = member.roles.len();
        member.roles.retain(|r| !keys.contains(&normalize_key(r)));
        if member.roles.len() == before {
            return Err(CatalogError::NotFound {
                entity: "Role",
                key: format!("'{}' for '{}' in show {show_id}", role.trim(), member.name),
            });
        }

        if member.roles.is_empty() {
            self.store.delete_row(TABLE, position).await?;
            info!(show = %show_id, name = %member.name, "Removed last role; member deleted");
            return Ok(None);
        }

        self.store
            .write_row(TABLE, position, Self::member_to_row(&layout, &member, Some(row)))
            .await?;

        info!(show = %show_id, name = %member.name, "Removed role");
        Ok(Some(member))
    }

    /// Deletes every team row of the show. Returns how many were removed.
    pub async fn delete_for_show(&self, show_id: ShowId) -> Result<usize> {
        let (_, rows) = self.rows_for_show(show_id).await?;
        let count = rows.len();
        for (position, _, _) in rows.into_iter().rev() {
            self.store.delete_row(TABLE, position).await?;
        }
        Ok(count)
    }
}

fn default_order(idx: usize) -> i32 {
    i32::try_from(idx + 1).unwrap_or(i32::MAX)
}

/// Works out the minimal row changes, falling back to a full rewrite when
/// keeping existing rows in place would list equal-order members in a
/// different sequence than requested.
fn plan_replacement(existing: &[(usize, Row, TeamMember)], desired: &[TeamMember]) -> ReplacePlan {
    let mut plan = ReplacePlan::default();
    let mut matched = vec![false; desired.len()];
    // Resulting storage sequence of the show's rows, as indexes into `desired`.
    let mut sequence = Vec::with_capacity(desired.len());

    for (position, _, current) in existing {
        let found = desired
            .iter()
            .enumerate()
            .find(|(i, d)| !matched[*i] && current.has_name(&d.name));

        match found {
            Some((i, wanted)) => {
                matched[i] = true;
                sequence.push(i);
                if current == wanted {
                    plan.unchanged += 1;
                } else {
                    plan.overwrite.push((*position, wanted.clone()));
                }
            }
            None => plan.delete.push(*position),
        }
    }

    for (i, wanted) in desired.iter().enumerate() {
        if !matched[i] {
            sequence.push(i);
            plan.append.push(wanted.clone());
        }
    }

    let requested: Vec<usize> = (0..desired.len()).collect();
    if listing_order(&sequence, desired) == listing_order(&requested, desired) {
        return plan;
    }

    debug!("Equal-order members would be reordered; rewriting the whole team");
    ReplacePlan {
        append: desired.to_vec(),
        overwrite: Vec::new(),
        delete: existing.iter().map(|(position, _, _)| *position).collect(),
        unchanged: 0,
    }
}

/// Indexes of `desired` in the order `list_for_show` would return them if
/// stored in `sequence` order.
fn listing_order(sequence: &[usize], desired: &[TeamMember]) -> Vec<usize> {
    let mut listed = sequence.to_vec();
    listed.sort_by_key(|&i| desired[i].order);
    listed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryRowStore;

    fn repo() -> (Arc<MemoryRowStore>, TeamRepository) {
        let store = Arc::new(MemoryRowStore::with_catalog_schema());
        let repo = TeamRepository::new(store.clone(), Arc::new(NameResolver::builtin()));
        (store, repo)
    }

    fn names(members: &[TeamMember]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[tokio::test]
    async fn list_sorts_by_order_then_storage() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.replace_for_show(
            show,
            &[
                TeamMemberInput::new("Ann").with_roles(&["Writer"]).with_order(2),
                TeamMemberInput::new("Bo").with_roles(&["Director"]).with_order(1),
                TeamMemberInput::new("Cy").with_roles(&["EP"]).with_order(2),
            ],
        )
        .await
        .unwrap();

        let listed = repo.list_for_show(show).await.unwrap();
        assert_eq!(names(&listed), vec!["Bo", "Ann", "Cy"]);
        assert_eq!(listed[2].roles, vec!["Executive Producer"]);
    }

    #[tokio::test]
    async fn replace_assigns_positional_orders() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.replace_for_show(
            show,
            &[
                TeamMemberInput::new("Ann").with_roles(&["Writer"]),
                TeamMemberInput::new("Bo").with_roles(&["Director"]),
            ],
        )
        .await
        .unwrap();

        let orders: Vec<i32> = repo
            .list_for_show(show)
            .await
            .unwrap()
            .iter()
            .map(|m| m.order)
            .collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn replace_only_touches_the_given_show() {
        let (store, repo) = repo();
        let (a, b) = (ShowId::new(), ShowId::new());
        repo.replace_for_show(a, &[TeamMemberInput::new("Ann").with_roles(&["Writer"])])
            .await
            .unwrap();
        repo.replace_for_show(b, &[TeamMemberInput::new("Bo").with_roles(&["Writer"])])
            .await
            .unwrap();

        repo.replace_for_show(a, &[]).await.unwrap();

        assert!(repo.list_for_show(a).await.unwrap().is_empty());
        assert_eq!(names(&repo.list_for_show(b).await.unwrap()), vec!["Bo"]);
        assert_eq!(store.read_all(TABLE).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_diffs_against_existing_rows() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.replace_for_show(
            show,
            &[
                TeamMemberInput::new("Ann").with_roles(&["Writer"]),
                TeamMemberInput::new("Bo").with_roles(&["Director"]),
                TeamMemberInput::new("Cy").with_roles(&["Producer"]),
            ],
        )
        .await
        .unwrap();

        let summary = repo
            .replace_for_show(
                show,
                &[
                    TeamMemberInput::new("Ann").with_roles(&["Writer"]),
                    TeamMemberInput::new("Bo").with_roles(&["Director", "EP"]),
                    TeamMemberInput::new("Di").with_roles(&["Star"]),
                ],
            )
            .await
            .unwrap();

        assert_eq!(
            summary,
            ReplaceSummary {
                added: 1,
                updated: 1,
                removed: 1,
                unchanged: 1,
            }
        );
        let listed = repo.list_for_show(show).await.unwrap();
        assert_eq!(names(&listed), vec!["Ann", "Bo", "Di"]);
        assert_eq!(listed[1].roles, vec!["Director", "Executive Producer"]);
    }

    #[tokio::test]
    async fn replace_keeps_requested_sequence_for_equal_orders() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.replace_for_show(
            show,
            &[TeamMemberInput::new("Bo").with_roles(&["Director"]).with_order(1)],
        )
        .await
        .unwrap();

        repo.replace_for_show(
            show,
            &[
                TeamMemberInput::new("Ann").with_roles(&["Writer"]).with_order(1),
                TeamMemberInput::new("Bo").with_roles(&["Director"]).with_order(1),
            ],
        )
        .await
        .unwrap();

        assert_eq!(names(&repo.list_for_show(show).await.unwrap()), vec!["Ann", "Bo"]);
    }

    #[tokio::test]
    async fn replace_rejects_duplicate_and_roleless_members() {
        let (_, repo) = repo();
        let show = ShowId::new();

        let err = repo
            .replace_for_show(
                show,
                &[
                    TeamMemberInput::new("Ann").with_roles(&["Writer"]),
                    TeamMemberInput::new("ANN").with_roles(&["Director"]),
                ],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);

        let err = repo
            .replace_for_show(show, &[TeamMemberInput::new("Ann")])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn add_member_checks_names_case_insensitively() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(show, &TeamMemberInput::new("Ann").with_roles(&["Writer"]))
            .await
            .unwrap();

        let err = repo
            .add_member(show, &TeamMemberInput::new("ann"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }

    #[tokio::test]
    async fn add_member_appends_after_highest_order() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(
            show,
            &TeamMemberInput::new("Ann").with_roles(&["Writer"]).with_order(5),
        )
        .await
        .unwrap();
        let bo = repo
            .add_member(show, &TeamMemberInput::new("Bo").with_roles(&["Dir"]))
            .await
            .unwrap();
        assert_eq!(bo.order, 6);
        assert_eq!(bo.roles, vec!["Director"]);
    }

    #[tokio::test]
    async fn remove_missing_member_is_not_found() {
        let (store, repo) = repo();
        let show = ShowId::new();
        let err = repo.remove_member(show, "Nobody").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.read_all(TABLE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_role_resolves_and_ignores_repeats() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(show, &TeamMemberInput::new("Ann").with_roles(&["Writer"]))
            .await
            .unwrap();

        let member = repo.add_role(show, "ann", "exec producer").await.unwrap();
        assert_eq!(member.roles, vec!["Writer", "Executive Producer"]);

        let member = repo.add_role(show, "Ann", "EP").await.unwrap();
        assert_eq!(member.roles.len(), 2);
    }

    #[tokio::test]
    async fn add_role_splits_lists_and_skips_held_roles() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(show, &TeamMemberInput::new("Ann").with_roles(&["Writer"]))
            .await
            .unwrap();

        let member = repo.add_role(show, "Ann", "writer, EP").await.unwrap();
        assert_eq!(member.roles, vec!["Writer", "Executive Producer"]);
        assert_eq!(member.render(), "Ann (Writer, Executive Producer)");

        let stored = repo.list_for_show(show).await.unwrap();
        assert_eq!(stored[0].roles, vec!["Writer", "Executive Producer"]);

        let err = repo.add_role(show, "Ann", " , ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn remove_role_accepts_lists() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(
            show,
            &TeamMemberInput::new("Ann").with_roles(&["Writer", "Director", "EP"]),
        )
        .await
        .unwrap();

        let remaining = repo.remove_role(show, "Ann", "dir, exec producer").await.unwrap();
        assert_eq!(remaining.map(|m| m.roles), Some(vec!["Writer".to_string()]));
    }

    #[tokio::test]
    async fn removing_last_role_deletes_member() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(show, &TeamMemberInput::new("Ann").with_roles(&["Writer", "Dir"]))
            .await
            .unwrap();

        let remaining = repo.remove_role(show, "Ann", "director").await.unwrap();
        assert_eq!(remaining.map(|m| m.roles), Some(vec!["Writer".to_string()]));

        assert!(repo.remove_role(show, "Ann", "Writer").await.unwrap().is_none());
        assert!(repo.list_for_show(show).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_absent_role_is_not_found() {
        let (_, repo) = repo();
        let show = ShowId::new();
        repo.add_member(show, &TeamMemberInput::new("Ann").with_roles(&["Writer"]))
            .await
            .unwrap();
        let err = repo.remove_role(show, "Ann", "Composer").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn unresolved_roles_are_kept_verbatim() {
        let (_, repo) = repo();
        let show = ShowId::new();
        let member = repo
            .add_member(show, &TeamMemberInput::new("Ann").with_roles(&["Puppeteer, Writer"]))
            .await
            .unwrap();
        assert_eq!(member.roles, vec!["Puppeteer", "Writer"]);
    }

    #[tokio::test]
    async fn delete_for_show_removes_only_that_show() {
        let (_, repo) = repo();
        let (a, b) = (ShowId::new(), ShowId::new());
        for show in [a, b] {
            repo.replace_for_show(
                show,
                &[
                    TeamMemberInput::new("Ann").with_roles(&["Writer"]),
                    TeamMemberInput::new("Bo").with_roles(&["Writer"]),
                ],
            )
            .await
            .unwrap();
        }

        assert_eq!(repo.delete_for_show(a).await.unwrap(), 2);
        assert!(repo.list_for_show(a).await.unwrap().is_empty());
        assert_eq!(repo.list_for_show(b).await.unwrap().len(), 2);
    }
}
