use application::transfer::{CreateNewContactDto, GetPhonebookContactsDto};
use kernel::prelude::entity::{ContactName, OwnerUserId, PhoneNumber};
use serde::Deserialize;

use crate::controller::{Intake, TryIntake};
use crate::error::ValidationProblem;

#[derive(Debug)]
pub struct GetPhonebookRequest {
    owner: OwnerUserId,
}

impl GetPhonebookRequest {
    pub fn new(owner: OwnerUserId) -> Self {
        Self { owner }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostNewContactRequest {
    contact_full_name: Option<String>,
    contact_phone_number: Option<String>,
}

pub struct PhonebookTransformer;

impl Intake<GetPhonebookRequest> for PhonebookTransformer {
    type To = GetPhonebookContactsDto;
    fn emit(&self, input: GetPhonebookRequest) -> Self::To {
        GetPhonebookContactsDto {
            owner_user_id: input.owner,
        }
    }
}

impl TryIntake<(OwnerUserId, PostNewContactRequest)> for PhonebookTransformer {
    type To = CreateNewContactDto;
    type Error = ValidationProblem;
    fn emit(
        &self,
        (owner, req): (OwnerUserId, PostNewContactRequest),
    ) -> Result<Self::To, Self::Error> {
        let mut problem = ValidationProblem::new();
        let name = required(
            &mut problem,
            "contactFullName",
            req.contact_full_name,
            ContactName::MAX_LENGTH,
        );
        let phone_number = required(
            &mut problem,
            "contactPhoneNumber",
            req.contact_phone_number,
            PhoneNumber::MAX_LENGTH,
        );
        match (name, phone_number) {
            (Some(name), Some(phone_number)) if problem.is_empty() => Ok(CreateNewContactDto {
                owner_user_id: owner,
                contact_full_name: name,
                contact_phone_number: phone_number,
            }),
            _ => Err(problem),
        }
    }
}

fn required(
    problem: &mut ValidationProblem,
    field: &str,
    value: Option<String>,
    max_length: usize,
) -> Option<String> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        problem.add_error(field, format!("The {field} field is required."));
        return None;
    };
    if value.contains('\0') {
        problem.add_error(
            field,
            format!("The field {field} must not contain null characters."),
        );
        return None;
    }
    if value.chars().count() > max_length {
        problem.add_error(
            field,
            format!("The field {field} must be a string with a maximum length of {max_length}."),
        );
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::prelude::entity::OwnerUserId;

    use super::{PhonebookTransformer, PostNewContactRequest};
    use crate::controller::TryIntake;

    fn emit(
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<application::transfer::CreateNewContactDto, crate::error::ValidationProblem> {
        let req = PostNewContactRequest {
            contact_full_name: name.map(ToOwned::to_owned),
            contact_phone_number: phone.map(ToOwned::to_owned),
        };
        PhonebookTransformer.emit((OwnerUserId::new(Uuid::new_v4()), req))
    }

    #[test]
    fn accepts_values_at_the_length_limits() {
        let name = "n".repeat(128);
        let phone = "1".repeat(32);
        let dto = emit(Some(&name), Some(&phone)).expect("valid request");
        assert_eq!(dto.contact_full_name, name);
        assert_eq!(dto.contact_phone_number, phone);
    }

    #[test]
    fn rejects_missing_blank_and_long_values() {
        let long_name = "n".repeat(129);
        let long_phone = "1".repeat(33);
        let cases = [
            (None, None),
            (Some(""), Some("")),
            (None, Some("111")),
            (Some(" "), Some("111")),
            (Some("Alice"), None),
            (Some("Alice"), Some("\t")),
            (Some("Alice"), Some(long_phone.as_str())),
            (Some(long_name.as_str()), Some("111")),
            (Some("Al\u{0}ice"), Some("111")),
            (Some("Alice"), Some("1\u{0}1")),
        ];
        for (name, phone) in cases {
            let problem = emit(name, phone).expect_err("invalid request");
            assert!(!problem.is_empty(), "{name:?} / {phone:?}");
        }
    }
}
