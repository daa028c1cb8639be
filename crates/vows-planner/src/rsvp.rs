//! RSVP service: public forms bound to guest-list pages.
//!
//! Couples configure a form from their guest list; guests answer it
//! through an unauthenticated link, and their answers are merged into
//! the guest list.

use std::collections::BTreeMap;

use tracing::info;
use uuid::Uuid;
use vows_auth::token::generate_slug;
use vows_core::error::{VowsError, VowsResult};
use vows_core::events::{PlannerEventBus, PlannerEventKind};
use vows_core::fields::opt_str_field;
use vows_core::lookup::find_fields;
use vows_core::models::rsvp::{
    CreateRsvpForm, PublicRsvpForm, RSVP_QUESTIONS, RsvpForm, RsvpResponse, UpdateRsvpForm,
};
use vows_core::repository::{PageRepository, PlannerRepository, RsvpRepository};
use vows_core::template::{GUEST_LIST, OVERVIEW};
use vows_core::view::guests::{GuestPatch, upsert_guest};

/// Questions enabled on a new form unless the couple says otherwise.
fn default_questions() -> BTreeMap<String, bool> {
    RSVP_QUESTIONS
        .iter()
        .map(|q| (q.to_string(), *q != "phone"))
        .collect()
}

fn check_questions(fields: &BTreeMap<String, bool>) -> VowsResult<()> {
    match fields.keys().find(|k| !RSVP_QUESTIONS.contains(&k.as_str())) {
        Some(unknown) => Err(VowsError::validation(format!(
            "unknown RSVP question: {unknown}"
        ))),
        None => Ok(()),
    }
}

/// Trim, drop blanks and drop case-insensitive duplicates.
fn clean_meal_options(options: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(options.len());
    for option in options {
        let option = option.trim();
        if !option.is_empty() && !cleaned.iter().any(|o| o.eq_ignore_ascii_case(option)) {
            cleaned.push(option.to_string());
        }
    }
    cleaned
}

/// The public URL guests open to answer.
pub fn share_link(base_url: &str, slug: &str) -> String {
    format!("{}/rsvp/{}", base_url.trim_end_matches('/'), slug)
}

pub struct RsvpService<P, G, R>
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

impl<P, G, R> RsvpService<P, G, R>
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

    /// Bind a form to a guest-list page. A page has at most one form;
    /// asking again returns the existing one unchanged.
    pub async fn create_form(
        &self,
        tenant_id: Uuid,
        page_id: Uuid,
        fields: Option<BTreeMap<String, bool>>,
        meal_options: Option<Vec<String>>,
    ) -> VowsResult<RsvpForm> {
        let planner = self.planner_repo.get_by_tenant(tenant_id).await?;
        let page = self.page_repo.get_by_id(planner.id, page_id).await?;
        if page.template_id != GUEST_LIST {
            return Err(VowsError::validation(
                "RSVP forms can only be attached to a guest list",
            ));
        }

        if let Some(existing) = self.rsvp_repo.get_by_page(tenant_id, page_id).await? {
            return Ok(existing);
        }

        let mut questions = default_questions();
        if let Some(fields) = fields {
            check_questions(&fields)?;
            questions.extend(fields);
        }

        let form = self
            .rsvp_repo
            .create(CreateRsvpForm {
                tenant_id,
                page_id,
                slug: generate_slug(),
                fields: questions,
                meal_options: clean_meal_options(meal_options.unwrap_or_default()),
            })
            .await?;

        info!(%tenant_id, %page_id, slug = %form.slug, "RSVP form created");
        Ok(form)
    }

    pub async fn get_form(&self, tenant_id: Uuid, page_id: Uuid) -> VowsResult<RsvpForm> {
        self.rsvp_repo
            .get_by_page(tenant_id, page_id)
            .await?
            .ok_or_else(|| VowsError::not_found("rsvp_form", page_id))
    }

    pub async fn update_form(
        &self,
        tenant_id: Uuid,
        form_id: Uuid,
        fields: Option<BTreeMap<String, bool>>,
        meal_options: Option<Vec<String>>,
    ) -> VowsResult<RsvpForm> {
        let current = self.rsvp_repo.get_by_id(tenant_id, form_id).await?;

        let fields = match fields {
            Some(fields) => {
                check_questions(&fields)?;
                let mut merged = current.fields;
                merged.extend(fields);
                Some(merged)
            }
            None => None,
        };

        self.rsvp_repo
            .update(
                tenant_id,
                form_id,
                UpdateRsvpForm {
                    fields,
                    meal_options: meal_options.map(clean_meal_options),
                },
            )
            .await
    }

    /// What a guest sees when opening the link. No authentication.
    pub async fn get_public_form(&self, slug: &str) -> VowsResult<PublicRsvpForm> {
        let form = self.rsvp_repo.get_by_slug(slug).await?;
        let planner = self.planner_repo.get_by_tenant(form.tenant_id).await?;
        let pages = self.page_repo.list_by_planner(planner.id).await?;

        let overview = find_fields(&pages, OVERVIEW);
        let couple = match (
            opt_str_field(overview, "partner1"),
            opt_str_field(overview, "partner2"),
        ) {
            (Some(a), Some(b)) => Some(format!("{a} & {b}")),
            (a, b) => a.or(b),
        };

        let questions = RSVP_QUESTIONS
            .iter()
            .filter(|q| form.asks(q))
            .map(|q| q.to_string())
            .collect();

        Ok(PublicRsvpForm {
            slug: form.slug,
            couple,
            wedding_date: opt_str_field(overview, "weddingDate"),
            questions,
            meal_options: form.meal_options,
        })
    }

    /// Record a guest's answer in the bound guest list. An existing
    /// guest with the same name (or email) is updated in place.
    /// Answers to questions the form does not ask are ignored.
    pub async fn submit(&self, slug: &str, response: RsvpResponse) -> VowsResult<String> {
        let form = self.rsvp_repo.get_by_slug(slug).await?;

        if response.name.trim().is_empty() {
            return Err(VowsError::validation("name is required"));
        }

        let asked = |q: &str, v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| form.asks(q) && !s.is_empty())
        };

        // A configured menu is authoritative; store its spelling.
        let meal = match asked("meal", response.meal) {
            Some(meal) if !form.meal_options.is_empty() => Some(
                form.meal_options
                    .iter()
                    .find(|o| o.eq_ignore_ascii_case(&meal))
                    .cloned()
                    .ok_or_else(|| {
                        VowsError::validation(format!(
                            "meal must be one of: {}",
                            form.meal_options.join(", ")
                        ))
                    })?,
            ),
            other => other,
        };

        let patch = GuestPatch {
            name: response.name,
            email: asked("email", response.email),
            phone: asked("phone", response.phone),
            rsvp: Some(response.attending),
            meal,
            plus_one: form.asks("plusOne").then_some(response.plus_one),
            dietary: asked("dietary", response.dietary),
            message: asked("message", response.message),
        };

        let planner = self.planner_repo.get_by_tenant(form.tenant_id).await?;
        let page = self.page_repo.get_by_id(planner.id, form.page_id).await?;
        let mut fields = page.fields;
        let guest_id = upsert_guest(&mut fields, patch)?;
        self.page_repo
            .update_fields(planner.id, page.id, fields)
            .await?;

        info!(
            tenant_id = %form.tenant_id,
            page_id = %page.id,
            %guest_id,
            attending = response.attending,
            "RSVP received"
        );
        self.events.publish(
            form.tenant_id,
            PlannerEventKind::PageUpdated { page_id: page.id },
        );
        Ok(guest_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_link_joins_cleanly() {
        assert_eq!(
            share_link("https://vows.example/", "abc123"),
            "https://vows.example/rsvp/abc123"
        );
        assert_eq!(
            share_link("https://vows.example", "abc123"),
            "https://vows.example/rsvp/abc123"
        );
    }

    #[test]
    fn meal_options_are_cleaned() {
        let cleaned = clean_meal_options(vec![
            " Fish ".into(),
            "".into(),
            "fish".into(),
            "Vegan".into(),
        ]);
        assert_eq!(cleaned, ["Fish", "Vegan"]);
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut fields = BTreeMap::new();
        fields.insert("shoeSize".to_string(), true);
        assert!(check_questions(&fields).is_err());
    }

    #[test]
    fn phone_is_off_by_default() {
        let defaults = default_questions();
        assert_eq!(defaults.get("phone"), Some(&false));
        assert_eq!(defaults.get("meal"), Some(&true));
    }
}
