//! Inspiration board service: palettes and the sparks filed in them.

use tracing::info;
use uuid::Uuid;
use vows_core::error::{VowsError, VowsResult};
use vows_core::models::palette::{CreatePalette, Palette, UpdatePalette};
use vows_core::models::spark::{CreateSpark, Spark, UpdateSpark};
use vows_core::repository::{PaletteRepository, SparkRepository};

/// Input for a new spark.
#[derive(Debug, Clone, Default)]
pub struct NewSpark {
    pub image_url: String,
    pub caption: Option<String>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    pub palette_id: Option<Uuid>,
}

fn check_url(url: &str, what: &str) -> VowsResult<String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| VowsError::validation(format!("{what} must be an http(s) URL")))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(VowsError::validation(format!("{what} is not a valid URL")));
    }
    Ok(url.to_string())
}

/// Lowercase, trim, drop blanks and duplicates, keep first-seen order.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

fn required_name(name: &str) -> VowsResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VowsError::validation("palette name is required"));
    }
    Ok(name.to_string())
}

pub struct BoardService<PL: PaletteRepository, S: SparkRepository> {
    palette_repo: PL,
    spark_repo: S,
}

impl<PL: PaletteRepository, S: SparkRepository> BoardService<PL, S> {
    pub fn new(palette_repo: PL, spark_repo: S) -> Self {
        Self {
            palette_repo,
            spark_repo,
        }
    }

    pub async fn create_palette(
        &self,
        tenant_id: Uuid,
        name: &str,
        description: Option<String>,
    ) -> VowsResult<Palette> {
        self.palette_repo
            .create(CreatePalette {
                tenant_id,
                name: required_name(name)?,
                description: description.map(|d| d.trim().to_string()),
            })
            .await
    }

    pub async fn list_palettes(&self, tenant_id: Uuid) -> VowsResult<Vec<Palette>> {
        self.palette_repo.list(tenant_id).await
    }

    pub async fn update_palette(
        &self,
        tenant_id: Uuid,
        palette_id: Uuid,
        input: UpdatePalette,
    ) -> VowsResult<Palette> {
        let name = input.name.as_deref().map(required_name).transpose()?;
        self.palette_repo
            .update(
                tenant_id,
                palette_id,
                UpdatePalette {
                    name,
                    description: input.description.map(|d| d.trim().to_string()),
                },
            )
            .await
    }

    /// Delete a palette; its sparks stay on the board, unfiled.
    pub async fn delete_palette(&self, tenant_id: Uuid, palette_id: Uuid) -> VowsResult<()> {
        self.palette_repo.get_by_id(tenant_id, palette_id).await?;
        self.spark_repo.unfile_palette(tenant_id, palette_id).await?;
        self.palette_repo.delete(tenant_id, palette_id).await?;
        info!(%tenant_id, %palette_id, "palette deleted");
        Ok(())
    }

    pub async fn create_spark(&self, tenant_id: Uuid, input: NewSpark) -> VowsResult<Spark> {
        let image_url = check_url(&input.image_url, "image URL")?;
        let source_url = input
            .source_url
            .filter(|u| !u.trim().is_empty())
            .map(|u| check_url(&u, "source URL"))
            .transpose()?;
        if let Some(palette_id) = input.palette_id {
            self.palette_repo.get_by_id(tenant_id, palette_id).await?;
        }

        self.spark_repo
            .create(CreateSpark {
                tenant_id,
                palette_id: input.palette_id,
                image_url,
                caption: input.caption.map(|c| c.trim().to_string()),
                source_url,
                tags: clean_tags(input.tags),
            })
            .await
    }

    /// All sparks, or only those in `palette_id`.
    pub async fn list_sparks(
        &self,
        tenant_id: Uuid,
        palette_id: Option<Uuid>,
    ) -> VowsResult<Vec<Spark>> {
        if let Some(palette_id) = palette_id {
            self.palette_repo.get_by_id(tenant_id, palette_id).await?;
        }
        self.spark_repo.list(tenant_id, palette_id).await
    }

    /// Edit caption/tags, or move the spark (`Some(None)` unfiles it).
    pub async fn update_spark(
        &self,
        tenant_id: Uuid,
        spark_id: Uuid,
        input: UpdateSpark,
    ) -> VowsResult<Spark> {
        if let Some(Some(palette_id)) = input.palette_id {
            self.palette_repo.get_by_id(tenant_id, palette_id).await?;
        }
        self.spark_repo
            .update(
                tenant_id,
                spark_id,
                UpdateSpark {
                    caption: input.caption.map(|c| c.trim().to_string()),
                    tags: input.tags.map(clean_tags),
                    palette_id: input.palette_id,
                },
            )
            .await
    }

    pub async fn delete_spark(&self, tenant_id: Uuid, spark_id: Uuid) -> VowsResult<()> {
        self.spark_repo.get_by_id(tenant_id, spark_id).await?;
        self.spark_repo.delete(tenant_id, spark_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(check_url("https://img.example/a.jpg", "image URL").is_ok());
        assert!(check_url(" http://img.example ", "image URL").is_ok());
    }

    #[test]
    fn rejects_other_urls() {
        for bad in ["ftp://x/y", "javascript:alert(1)", "https://", "https:///a", "https://a b"] {
            assert!(check_url(bad, "image URL").is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn tags_are_normalised() {
        let tags = clean_tags(vec!["#Boho".into(), " boho ".into(), "".into(), "Gold".into()]);
        assert_eq!(tags, ["boho", "gold"]);
    }
}
