use application::service::{CreateNewContactService, GetPhonebookContactsService};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use kernel::interface::query::DependOnPhonebookQuery;
use kernel::interface::update::DependOnPhonebookModifier;

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::{ErrorStatus, ValidationProblem};
use crate::handler::AppModule;
use crate::request::{GetPhonebookRequest, PhonebookTransformer, PostNewContactRequest};
use crate::response::PhonebookPresenter;

pub trait PhonebookRouter {
    fn route_phonebook(self) -> Self;
}

impl<D> PhonebookRouter for Router<AppModule<D>>
where
    D: DependOnPhonebookQuery + DependOnPhonebookModifier,
{
    fn route_phonebook(self) -> Self {
        self.route(
            "/phonebook",
            get(
                |State(module): State<AppModule<D>>, Authenticated(owner): Authenticated| async move {
                    Controller::new(PhonebookTransformer, PhonebookPresenter)
                        .intake(GetPhonebookRequest::new(owner))
                        .handle(|dto| async move {
                            module.database().get_phonebook_contacts(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/phonebook/contacts",
            post(
                |State(module): State<AppModule<D>>,
                 Authenticated(owner): Authenticated,
                 body: Result<Json<PostNewContactRequest>, JsonRejection>| async move {
                    let Json(req) = match body {
                        Ok(body) => body,
                        Err(rejection) => {
                            return Err(ErrorStatus::from(ValidationProblem::from(rejection)))
                        }
                    };
                    let transformed = match Controller::new(PhonebookTransformer, PhonebookPresenter)
                        .try_intake((owner, req))
                    {
                        Ok(transformed) => transformed,
                        Err(problem) => return Err(ErrorStatus::from(problem)),
                    };
                    transformed
                        .handle(|dto| async move { module.database().create_new_contact(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
