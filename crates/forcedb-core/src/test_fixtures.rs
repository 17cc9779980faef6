use crate::{
    codec::Attributes,
    config::MappingConfig,
    registry::Registry,
    traits::Mapped,
};
use forcedb_schema::node::{FieldSchema, TypeSchema, TypeToken};
use serde::{Deserialize, Serialize};

/// Fresh, unshared registry with the default mapping configuration.
pub(crate) fn registry() -> Registry {
    Registry::new(MappingConfig::default())
}

///
/// SimpleBean
/// Flat record whose attributes field is declared last.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SimpleBean {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,

    #[serde(rename = "attributes")]
    pub(crate) attributes: Option<Attributes>,
}

impl Mapped for SimpleBean {
    fn schema() -> TypeSchema {
        TypeSchema::object("SimpleBean")
            .id("Id")
            .simple("Name")
            .simple("Description")
            .attributes()
    }
}

///
/// SelfRef
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SelfRef {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,

    #[serde(rename = "Self")]
    pub(crate) parent: Option<Box<SelfRef>>,
}

impl Mapped for SelfRef {
    fn schema() -> TypeSchema {
        TypeSchema::object("SelfRef")
            .id("Id")
            .simple("Name")
            .reference::<Self>("Self")
    }
}

///
/// Account
///
/// Metadata-aware record with an owner, an audit stamp, a child relationship
/// back to itself through `Contact`, and one-sided write flags.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Account {
    #[serde(rename = "attributes")]
    pub(crate) attributes: Option<Attributes>,

    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,

    /// Settable on create only.
    pub(crate) site: Option<String>,

    /// Settable on update only.
    pub(crate) rating: Option<String>,

    pub(crate) owner: Option<Box<User>>,
    pub(crate) created_date: Option<String>,

    #[serde(default)]
    pub(crate) contacts: Vec<Contact>,
}

impl Mapped for Account {
    fn schema() -> TypeSchema {
        TypeSchema::object("Account")
            .attributes()
            .id("Id")
            .simple("Name")
            .field(FieldSchema::simple("Site").updatable(false))
            .field(FieldSchema::simple("Rating").insertable(false))
            .reference::<User>("Owner")
            .simple("CreatedDate")
            .children::<Contact>("Contacts")
    }
}

///
/// User
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct User {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
}

impl Mapped for User {
    fn schema() -> TypeSchema {
        TypeSchema::object("User").id("Id").simple("Name").simple("Email")
    }
}

///
/// Contact
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Contact {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) account: Option<Box<Account>>,
}

impl Mapped for Contact {
    fn schema() -> TypeSchema {
        TypeSchema::object("Contact")
            .id("Id")
            .simple("Name")
            .reference::<Account>("Account")
    }
}

///
/// Opportunity
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Opportunity {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) amount: Option<f64>,
}

impl Mapped for Opportunity {
    fn schema() -> TypeSchema {
        TypeSchema::object("Opportunity")
            .id("Id")
            .simple("Name")
            .simple("Amount")
    }
}

///
/// NameRef
/// Generic fallback shape, wire type `Name`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NameRef {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
}

impl Mapped for NameRef {
    fn schema() -> TypeSchema {
        TypeSchema::object("Name").id("Id").simple("Name")
    }
}

///
/// Task
/// Two polymorphic relationships, one with a default and one without.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Task {
    pub(crate) id: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) what: Option<What>,
    pub(crate) who: Option<Who>,
}

impl Mapped for Task {
    fn schema() -> TypeSchema {
        TypeSchema::object("Task")
            .id("Id")
            .simple("Subject")
            .field(
                FieldSchema::polymorphic(
                    "What",
                    [TypeToken::of::<Account>(), TypeToken::of::<Opportunity>()],
                )
                .default_to(TypeToken::of::<NameRef>()),
            )
            .field(FieldSchema::polymorphic(
                "Who",
                [TypeToken::of::<Contact>(), TypeToken::of::<User>()],
            ))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) enum What {
    Account(Box<Account>),
    Opportunity(Box<Opportunity>),
    Name(Box<NameRef>),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) enum Who {
    Contact(Box<Contact>),
    User(Box<User>),
}

///
/// Address
/// Plain value type, not a remote object.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub(crate) struct Address {
    pub(crate) street: Option<String>,
}

impl Mapped for Address {
    fn schema() -> TypeSchema {
        TypeSchema::unmapped("Address").simple("street")
    }
}

///
/// Shipment
/// Relationship to an unmapped type.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Shipment {
    pub(crate) id: Option<String>,
    pub(crate) destination: Option<Address>,
}

impl Mapped for Shipment {
    fn schema() -> TypeSchema {
        TypeSchema::object("Shipment")
            .id("Id")
            .reference::<Address>("Destination")
    }
}

///
/// Tagged
/// Scalar collection field.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Tagged {
    pub(crate) id: Option<String>,

    #[serde(default)]
    pub(crate) labels: Vec<String>,
}

impl Mapped for Tagged {
    fn schema() -> TypeSchema {
        TypeSchema::object("Tagged")
            .id("Id")
            .field(FieldSchema::collection("Labels", TypeToken::scalar::<String>()))
    }
}

///
/// Audited
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Audited {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) last_modified_date: Option<String>,
    pub(crate) stamp: Option<String>,
}

impl Mapped for Audited {
    fn schema() -> TypeSchema {
        TypeSchema::object("Audited")
            .id("Id")
            .simple("Name")
            .simple("LastModifiedDate")
            .field(FieldSchema::simple("Stamp").audit())
    }
}
