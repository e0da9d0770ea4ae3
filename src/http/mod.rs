// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP surface over the document store.
//!
//! Thin JSON endpoints the embedding page calls, plus raw document delivery
//! for the editor's fetch path. Every failure body carries the exact message
//! the page shows inline, so the store's wording is the contract.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::model::DocumentInfo;
use crate::store::{create_failure_message, save_failure_message, DocumentFolder};

pub fn router(folder: DocumentFolder) -> Router {
    Router::new()
        .route("/diagrams", get(list_diagrams))
        .route("/diagrams/create", post(create_diagram))
        .route("/diagrams/save", post(save_diagram))
        .route("/files/{file_name}", get(fetch_document))
        .with_state(folder)
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    file_name: Option<String>,
    xml: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedBody {
    success: bool,
    file_name: String,
    title: String,
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedBody {
    success: bool,
    file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedDocument {
    file_name: String,
    title: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

fn failure(status: StatusCode, message: &str) -> Response {
    let body = FailureBody { success: false, message: message.to_owned() };
    (status, Json(body)).into_response()
}

async fn create_diagram(
    State(folder): State<DocumentFolder>,
    Json(request): Json<CreateRequest>,
) -> Response {
    let Some(name) = request.name.filter(|name| !name.trim().is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "Name required");
    };

    match folder.create(&name).await {
        Ok(info) => Json(CreatedBody {
            success: true,
            file_name: info.file_name().to_owned(),
            title: info.title().to_owned(),
            url: info.url().to_owned(),
        })
        .into_response(),
        // Store refusals are conflicts with the current state; 400 is
        // reserved for a request missing the name outright.
        Err(err) => failure(StatusCode::CONFLICT, create_failure_message(&err)),
    }
}

async fn save_diagram(
    State(folder): State<DocumentFolder>,
    Json(request): Json<SaveRequest>,
) -> Response {
    let (Some(file_name), Some(xml)) = (request.file_name, request.xml) else {
        return failure(StatusCode::BAD_REQUEST, "FileName and Xml required");
    };

    match folder.save(&file_name, &xml).await {
        Ok(written) => Json(SavedBody { success: true, file_name: written }).into_response(),
        Err(err) => failure(StatusCode::BAD_REQUEST, save_failure_message(&err)),
    }
}

async fn list_diagrams(State(folder): State<DocumentFolder>) -> Json<Vec<ListedDocument>> {
    Json(folder.list().iter().map(listed).collect())
}

fn listed(info: &DocumentInfo) -> ListedDocument {
    ListedDocument {
        file_name: info.file_name().to_owned(),
        title: info.title().to_owned(),
        url: info.url().to_owned(),
    }
}

async fn fetch_document(
    State(folder): State<DocumentFolder>,
    Path(file_name): Path<String>,
) -> Response {
    let Some(path) = folder.resolve_path(&file_name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            ([(header::CONTENT_TYPE, "application/xml")], content).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
