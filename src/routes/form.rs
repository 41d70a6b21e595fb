use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use std::collections::HashMap;

use crate::db::Submission;

/// A [`Submission`] read from either an urlencoded or a multipart form body.
pub struct SubmissionForm(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for SubmissionForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Form(submission) = Form::<Submission>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(submission));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(IntoResponse::into_response)?;
            fields.insert(name, value);
        }

        Ok(Self(Submission {
            name: take_field(&mut fields, "name")?,
            role: take_field(&mut fields, "role")?,
            motivation: take_field(&mut fields, "motivation")?,
            performance: take_field(&mut fields, "performance")?,
            objectives: take_field(&mut fields, "objectives")?,
        }))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| {
            value
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

fn take_field(fields: &mut HashMap<String, String>, name: &str) -> Result<String, Response> {
    fields.remove(name).ok_or_else(|| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": format!("missing field `{}`", name) })),
        )
            .into_response()
    })
}
