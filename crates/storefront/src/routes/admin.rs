//! Catalog admin panel.
//!
//! Product forms post multipart so an image can be uploaded; an uploaded file
//! is stored inline as a `data:` URL and takes precedence over the typed
//! image URL.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use lumina_luxe_core::{AppSection, Category, Product, ProductDraft, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Nav;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{AdminError, CatalogAdminService};
use crate::state::AppState;

/// Product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub nav: Nav,
    pub products: Vec<Product>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/form.html")]
pub struct ProductFormTemplate {
    pub nav: Nav,
    pub heading: &'static str,
    pub action: String,
    pub draft: ProductDraft,
    pub categories: [Category; 2],
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn new_product(nav: Nav, draft: ProductDraft) -> Self {
        Self {
            nav,
            heading: "新規商品",
            action: "/admin/products".to_string(),
            draft,
            categories: Category::ALL,
            error: None,
        }
    }

    fn edit_product(nav: Nav, id: &ProductId, draft: ProductDraft) -> Self {
        Self {
            nav,
            heading: "商品編集",
            action: format!("/admin/products/{id}"),
            draft,
            categories: Category::ALL,
            error: None,
        }
    }
}

// =============================================================================
// Form parsing
// =============================================================================

/// An uploaded image file.
#[derive(Debug)]
struct Upload {
    media_type: Option<String>,
    data: Vec<u8>,
}

fn bad_request(e: &axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(e.body_text())
}

async fn read_fields(mut multipart: Multipart) -> Result<(HashMap<String, String>, Option<Upload>)> {
    let mut fields = HashMap::new();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| bad_request(&e))? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image_file" {
            let media_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(|e| bad_request(&e))?;
            if !data.is_empty() {
                upload = Some(Upload {
                    media_type,
                    data: data.to_vec(),
                });
            }
        } else {
            let value = field.text().await.map_err(|e| bad_request(&e))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, upload))
}

/// Encode an uploaded image as a `data:` URL.
fn data_url(upload: &Upload) -> Result<String> {
    let media_type = upload
        .media_type
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("image/jpeg");
    if !media_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "画像ファイルのみアップロードできます: {media_type}"
        )));
    }
    Ok(format!(
        "data:{media_type};base64,{}",
        STANDARD.encode(&upload.data)
    ))
}

/// Build a draft from submitted form fields.
///
/// Missing text fields fall back to [`ProductDraft::default`]; numbers that
/// don't parse are a bad request.
fn draft_from_fields(
    mut fields: HashMap<String, String>,
    upload: Option<&Upload>,
) -> Result<ProductDraft> {
    let defaults = ProductDraft::default();
    let mut take = |key: &str| fields.remove(key).map(|v| v.trim().to_string());

    let price = match take("price").filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| AppError::BadRequest(format!("価格が正しくありません: {raw}")))?,
        None => defaults.price,
    };
    let rating = match take("rating").filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<f32>()
            .map_err(|_| AppError::BadRequest(format!("評価が正しくありません: {raw}")))?,
        None => defaults.rating,
    };
    let category = match take("category").filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse::<Category>().map_err(AppError::BadRequest)?,
        None => defaults.category,
    };

    let image = match upload {
        Some(upload) => data_url(upload)?,
        None => take("image").unwrap_or(defaults.image),
    };

    Ok(ProductDraft {
        name: take("name").unwrap_or(defaults.name),
        price,
        category,
        description: take("description").unwrap_or(defaults.description),
        image,
        color: take("color")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.color),
        rating,
    })
}

async fn admin_nav(session: &Session) -> Result<Nav> {
    Nav::load(session, Some(AppSection::Admin), AppSection::Admin.path()).await
}

/// Render the form again with a validation message.
fn invalid(mut template: ProductFormTemplate, err: &AdminError) -> Response {
    template.error = Some(format!("入力内容に誤りがあります: {err}"));
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Product table.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<AdminIndexTemplate> {
    Ok(AdminIndexTemplate {
        nav: admin_nav(&session).await?,
        products: state.catalog().products().await,
    })
}

/// Empty new-product form.
#[instrument(skip(session))]
pub async fn new_product(session: Session) -> Result<ProductFormTemplate> {
    Ok(ProductFormTemplate::new_product(
        admin_nav(&session).await?,
        ProductDraft::default(),
    ))
}

/// Create a product.
#[instrument(skip(state, session, multipart))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let (fields, upload) = read_fields(multipart).await?;
    let draft = draft_from_fields(fields, upload.as_ref())?;

    match CatalogAdminService::new(state.catalog()).create(draft.clone()).await {
        Ok(product) => {
            add_breadcrumb("admin", "Product created", Some(&[("product_id", product.id.as_str())]));
            Ok(Redirect::to(AppSection::Admin.path()).into_response())
        }
        Err(e @ AdminError::Invalid(_)) => Ok(invalid(
            ProductFormTemplate::new_product(admin_nav(&session).await?, draft),
            &e,
        )),
        Err(e) => Err(e.into()),
    }
}

/// Edit form pre-filled with a product's fields.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate::edit_product(
        admin_nav(&session).await?,
        &id,
        ProductDraft::from(&product),
    ))
}

/// Overwrite a product.
#[instrument(skip(state, session, multipart))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = ProductId::new(id);
    let (fields, upload) = read_fields(multipart).await?;
    let draft = draft_from_fields(fields, upload.as_ref())?;

    match CatalogAdminService::new(state.catalog()).update(&id, draft.clone()).await {
        Ok(_) => {
            add_breadcrumb("admin", "Product updated", Some(&[("product_id", id.as_str())]));
            Ok(Redirect::to(AppSection::Admin.path()).into_response())
        }
        Err(e @ AdminError::Invalid(_)) => Ok(invalid(
            ProductFormTemplate::edit_product(admin_nav(&session).await?, &id, draft),
            &e,
        )),
        Err(e) => Err(e.into()),
    }
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = ProductId::new(id);
    CatalogAdminService::new(state.catalog()).delete(&id).await?;
    add_breadcrumb("admin", "Product deleted", Some(&[("product_id", id.as_str())]));
    Ok(Redirect::to(AppSection::Admin.path()))
}

#[cfg(test)]
mod tests {
    use lumina_luxe_core::DEFAULT_PRODUCT_COLOR;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_draft_from_fields() {
        let draft = draft_from_fields(
            fields(&[
                ("name", " ルミナ・セラム "),
                ("price", "38000"),
                ("category", "化粧品"),
                ("description", "夜のための美容液"),
                ("image", "https://example.com/serum.jpg"),
                ("color", ""),
                ("rating", "4.5"),
            ]),
            None,
        )
        .expect("draft");

        assert_eq!(draft.name, "ルミナ・セラム");
        assert_eq!(draft.price, 38_000);
        assert_eq!(draft.category, Category::Cosmetics);
        assert_eq!(draft.image, "https://example.com/serum.jpg");
        assert_eq!(draft.color, DEFAULT_PRODUCT_COLOR);
        assert!((draft.rating - 4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_category_slug_accepted() {
        let draft = draft_from_fields(fields(&[("category", "perfume")]), None).expect("draft");
        assert_eq!(draft.category, Category::Perfume);
    }

    #[test]
    fn test_bad_numbers_rejected() {
        let err = draft_from_fields(fields(&[("price", "abc")]), None).expect_err("bad price");
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = draft_from_fields(fields(&[("rating", "high")]), None).expect_err("bad rating");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_upload_becomes_data_url() {
        let upload = Upload {
            media_type: Some("image/png".to_string()),
            data: vec![0x89, b'P', b'N', b'G'],
        };
        let draft = draft_from_fields(
            fields(&[("image", "https://example.com/ignored.jpg")]),
            Some(&upload),
        )
        .expect("draft");
        assert_eq!(draft.image, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_non_image_upload_rejected() {
        let upload = Upload {
            media_type: Some("application/pdf".to_string()),
            data: vec![1, 2, 3],
        };
        assert!(matches!(data_url(&upload), Err(AppError::BadRequest(_))));
    }
}
