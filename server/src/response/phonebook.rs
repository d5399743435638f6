use application::transfer::PhonebookContactDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    id: i64,
    full_name: String,
    phone_number: String,
}

#[derive(Debug, Serialize)]
pub struct PhonebookResponse {
    results: Vec<ContactResponse>,
}

impl IntoResponse for PhonebookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct PhonebookPresenter;

impl Exhaust<Vec<PhonebookContactDto>> for PhonebookPresenter {
    type To = PhonebookResponse;
    fn emit(&self, input: Vec<PhonebookContactDto>) -> Self::To {
        let results = input
            .into_iter()
            .map(|contact| ContactResponse {
                id: contact.id,
                full_name: contact.contact_name,
                phone_number: contact.contact_phone_number,
            })
            .collect();
        PhonebookResponse { results }
    }
}

impl Exhaust<()> for PhonebookPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::OK
    }
}
