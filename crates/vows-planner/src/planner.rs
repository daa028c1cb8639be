//! Planner service: page lifecycle, the field-update protocol and
//! page reordering.
//!
//! Every write is scoped through the tenant's planner and publishes a
//! [`PlannerEventKind`] on success.

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use vows_core::error::{VowsError, VowsResult};
use vows_core::events::{PlannerEventBus, PlannerEventKind};
use vows_core::fields::{Fields, merge_field};
use vows_core::lookup::find_fields;
use vows_core::models::page::Page;
use vows_core::models::planner::{Planner, PlannerWithPages};
use vows_core::reorder::validate_permutation;
use vows_core::repository::{PageRepository, PlannerRepository, RsvpRepository};
use vows_core::template::{self, GUEST_LIST, SEATING_CHART};
use vows_core::view::{self, PageView, guests, seating};

pub struct PlannerService<P, G, R>
where
    P: PlannerRepository,
    G: PageRepository,
    R: RsvpRepository,
{
    planner_repo: P,
    page_repo: G,
    rsvp_repo: R,
    events: PlannerEventBus,
}

impl<P, G, R> PlannerService<P, G, R>
where
    P: PlannerRepository,
    G: PageRepository,
    R: RsvpRepository,
{
    pub fn new(planner_repo: P, page_repo: G, rsvp_repo: R, events: PlannerEventBus) -> Self {
        Self {
            planner_repo,
            page_repo,
            rsvp_repo,
            events,
        }
    }

    /// The tenant's planner and its pages in display order.
    pub async fn get_planner(&self, tenant_id: Uuid) -> VowsResult<PlannerWithPages> {
        let planner = self.planner_repo.get_by_tenant(tenant_id).await?;
        let pages = self.page_repo.list_by_planner(planner.id).await?;
        Ok(PlannerWithPages { planner, pages })
    }

    async fn planner(&self, tenant_id: Uuid) -> VowsResult<Planner> {
        self.planner_repo.get_by_tenant(tenant_id).await
    }

    pub async fn get_page(&self, tenant_id: Uuid, page_id: Uuid) -> VowsResult<Page> {
        let planner = self.planner(tenant_id).await?;
        self.page_repo.get_by_id(planner.id, page_id).await
    }

    pub async fn create_page(
        &self,
        tenant_id: Uuid,
        template_id: &str,
        title: Option<String>,
    ) -> VowsResult<Page> {
        let template = template::get(template_id)
            .ok_or_else(|| VowsError::validation(format!("unknown template: {template_id}")))?;

        let planner = self.planner(tenant_id).await?;
        let count = self.page_repo.list_by_planner(planner.id).await?.len();
        let page = self
            .page_repo
            .create(template.new_page(planner.id, title, count as u32))
            .await?;
        self.planner_repo.touch(tenant_id, planner.id).await?;

        info!(%tenant_id, page_id = %page.id, template_id, "page created");
        self.events
            .publish(tenant_id, PlannerEventKind::PageCreated { page_id: page.id });
        Ok(page)
    }

    /// Persist a page's complete `fields` object. Last write wins.
    pub async fn update_fields(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        fields: Fields,
    ) -> VowsResult<Page> {
        let planner = self.planner(tenant_id).await?;
        let page = self
            .page_repo
            .update_fields(planner.id, page_id, fields)
            .await?;
        self.events
            .publish(tenant_id, PlannerEventKind::PageUpdated { page_id });
        Ok(page)
    }

    /// Merge a single key into a page's fields.
    pub async fn update_field(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        key: &str,
        value: Value,
    ) -> VowsResult<Page> {
        if key.trim().is_empty() {
            return Err(VowsError::validation("field key is required"));
        }
        let page = self.get_page(tenant_id, page_id).await?;
        let mut fields = page.fields;
        merge_field(&mut fields, key, value);
        self.update_fields(tenant_id, page_id, fields).await
    }

    pub async fn rename_page(&self, tenant_id: Uuid, page_id: Uuid, title: &str) -> VowsResult<Page> {
        let title = title.trim();
        if title.is_empty() {
            return Err(VowsError::validation("page title is required"));
        }
        let planner = self.planner(tenant_id).await?;
        let page = self
            .page_repo
            .rename(planner.id, page_id, title.to_string())
            .await?;
        self.events
            .publish(tenant_id, PlannerEventKind::PageUpdated { page_id });
        Ok(page)
    }

    /// Delete a page. The last remaining page cannot be deleted;
    /// surviving pages are renumbered `0..n-1`.
    pub async fn delete_page(&self, tenant_id: Uuid, page_id: Uuid) -> VowsResult<()> {
        let planner = self.planner(tenant_id).await?;
        let pages = self.page_repo.list_by_planner(planner.id).await?;

        let page = pages
            .iter()
            .find(|p| p.id == page_id)
            .ok_or_else(|| VowsError::not_found("page", page_id))?;
        if pages.len() <= 1 {
            return Err(VowsError::validation("a planner must keep at least one page"));
        }

        if page.template_id == GUEST_LIST {
            self.rsvp_repo.delete_by_page(tenant_id, page_id).await?;
        }
        self.page_repo.delete(planner.id, page_id).await?;

        let remaining: Vec<Uuid> = pages
            .iter()
            .map(|p| p.id)
            .filter(|id| *id != page_id)
            .collect();
        self.page_repo.set_order(planner.id, &remaining).await?;
        self.planner_repo.touch(tenant_id, planner.id).await?;

        info!(%tenant_id, %page_id, "page deleted");
        self.events
            .publish(tenant_id, PlannerEventKind::PageDeleted { page_id });
        Ok(())
    }

    /// Apply a new page order. `page_ids` must be an exact permutation
    /// of the planner's pages; otherwise nothing changes.
    pub async fn reorder(&self, tenant_id: Uuid, page_ids: &[Uuid]) -> VowsResult<Vec<Page>> {
        let planner = self.planner(tenant_id).await?;
        let current: Vec<Uuid> = self
            .page_repo
            .list_by_planner(planner.id)
            .await?
            .iter()
            .map(|p| p.id)
            .collect();

        if let Err(err) = validate_permutation(&current, page_ids) {
            warn!(%tenant_id, error = %err, "rejected page reorder");
            return Err(err);
        }

        self.page_repo.set_order(planner.id, page_ids).await?;
        self.planner_repo.touch(tenant_id, planner.id).await?;
        self.events
            .publish(tenant_id, PlannerEventKind::PagesReordered);
        self.page_repo.list_by_planner(planner.id).await
    }

    pub async fn render_page(&self, tenant_id: Uuid, page_id: Uuid) -> VowsResult<PageView> {
        let PlannerWithPages { pages, .. } = self.get_planner(tenant_id).await?;
        let page = pages
            .iter()
            .find(|p| p.id == page_id)
            .ok_or_else(|| VowsError::not_found("page", page_id))?;
        Ok(view::render(page, &pages))
    }

    /// Flip a guest's RSVP flag on a guest-list page.
    pub async fn toggle_rsvp(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        guest_id: &str,
    ) -> VowsResult<Page> {
        self.edit(tenant_id, page_id, GUEST_LIST, |fields, _| {
            guests::toggle_rsvp(fields, guest_id).map(|_| ())
        })
        .await
    }

    /// Seat a guest on a seating-chart page.
    pub async fn assign_seat(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        table_id: &str,
        guest_id: &str,
    ) -> VowsResult<Page> {
        self.edit(tenant_id, page_id, SEATING_CHART, |fields, pages| {
            let guest_list = find_fields(pages, GUEST_LIST);
            seating::assign_guest(fields, guest_list, table_id, guest_id)
        })
        .await
    }

    pub async fn unassign_seat(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        guest_id: &str,
    ) -> VowsResult<Page> {
        self.edit(tenant_id, page_id, SEATING_CHART, |fields, _| {
            seating::unassign_guest(fields, guest_id);
            Ok(())
        })
        .await
    }

    /// Load a page of `template_id` and its siblings, apply `f` to a copy
    /// of its fields and persist the result. Nothing is written when the
    /// page has another template or `f` fails.
    async fn edit<F>(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        template_id: &str,
        f: F,
    ) -> VowsResult<Page>
    where
        F: FnOnce(&mut Fields, &[Page]) -> VowsResult<()> + Send,
    {
        let PlannerWithPages { planner, pages } = self.get_planner(tenant_id).await?;
        let page = pages
            .iter()
            .find(|p| p.id == page_id)
            .ok_or_else(|| VowsError::not_found("page", page_id))?;
        if page.template_id != template_id {
            return Err(VowsError::validation(format!(
                "page is a {} page, not a {template_id} page",
                page.template_id
            )));
        }

        let mut fields = page.fields.clone();
        f(&mut fields, &pages)?;

        let page = self
            .page_repo
            .update_fields(planner.id, page_id, fields)
            .await?;
        self.events
            .publish(tenant_id, PlannerEventKind::PageUpdated { page_id });
        Ok(page)
    }
}
