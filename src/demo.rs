//! Operations documented by the bundled server: a small user service.
//!
//! Typed operations describe their inputs with [`Reflect`]; the rest come
//! from `docs/users.yaml`, which is compiled into the binary and served by
//! [`embedded_docs`] unless debug mode reads the directory from disk.

use crate::api_doc::ApiDoc;
use crate::entry::MethodSpec;
use crate::error::Result;
use crate::reflect::{FieldDesc, RecordDesc, Reflect, TypeDesc};
use crate::registry::HttpMethod;

const USERS_DOC: &str = include_str!("../docs/users.yaml");

/// Loader for the doc files bundled with the binary.
pub fn embedded_docs(key: &str) -> anyhow::Result<Vec<u8>> {
    match key {
        "users.yaml" => Ok(USERS_DOC.as_bytes().to_vec()),
        other => anyhow::bail!("no embedded doc file named '{}'", other),
    }
}

/// Generic acknowledgement returned by mutating endpoints
pub struct SuccessResp {
    pub message: String,
    pub result: i32,
}

impl Reflect for SuccessResp {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("SuccessResp")
            .field(FieldDesc::of::<String>("Message").tag("message,omitempty"))
            .field(FieldDesc::of::<i32>("Result").tag("result"))
            .into()
    }
}

pub struct Timestamps {
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl Reflect for Timestamps {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("Timestamps")
            .field(
                FieldDesc::of::<i64>("CreatedAt")
                    .tag("created_at")
                    .doc("unix seconds"),
            )
            .field(FieldDesc::of::<Option<i64>>("UpdatedAt").tag("updated_at,omitempty"))
            .into()
    }
}

pub struct User {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Vec<u8>,
    pub roles: Vec<String>,
    pub password_hash: String,
    pub timestamps: Timestamps,
}

impl Reflect for User {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("User")
            .field(FieldDesc::of::<u64>("Id").tag("id"))
            .field(FieldDesc::of::<String>("Name").tag("name").doc("display name"))
            .field(FieldDesc::of::<Option<String>>("Email").tag("email,omitempty"))
            .field(FieldDesc::of::<Vec<u8>>("Avatar").tag("avatar,omitempty"))
            .field(FieldDesc::of::<Vec<String>>("Roles").tag("roles"))
            .field(FieldDesc::of::<String>("PasswordHash").tag("-"))
            .embed::<Timestamps>()
            .into()
    }
}

pub struct CreateUser {
    pub name: String,
    pub email: Option<String>,
    pub password: String,
}

impl Reflect for CreateUser {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("CreateUser")
            .field(FieldDesc::of::<String>("Name").tag("name"))
            .field(FieldDesc::of::<Option<String>>("Email").tag("email,omitempty"))
            .field(FieldDesc::of::<String>("Password").tag("password"))
            .into()
    }
}

pub struct ListQuery {
    pub page: u32,
    pub size: Option<u32>,
    pub keyword: Option<String>,
}

impl Reflect for ListQuery {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("ListQuery")
            .field(FieldDesc::of::<u32>("Page").tag("page").doc("1-based page number"))
            .field(FieldDesc::of::<Option<u32>>("Size").tag("size,omitempty").doc("page size"))
            .field(FieldDesc::of::<Option<String>>("Keyword").tag("keyword,omitempty"))
            .into()
    }
}

pub struct IdPath {
    pub id: u64,
}

impl Reflect for IdPath {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("IdPath")
            .field(FieldDesc::of::<u64>("Id").tag("id").doc("user id"))
            .into()
    }
}

pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Reflect for LoginForm {
    fn type_desc() -> TypeDesc {
        RecordDesc::new("LoginForm")
            .field(FieldDesc::of::<String>("Username").tag("username"))
            .field(FieldDesc::of::<String>("Password").tag("password"))
            .into()
    }
}

/// Register every operation of the user service.
pub fn register(doc: &mut ApiDoc) -> Result<()> {
    let base = doc.config().base_path.clone();
    let users = format!("{}/users", base);
    let auth = format!("{}/auth", base);

    doc.register_typed(
        &base,
        "/users",
        HttpMethod::Get,
        &MethodSpec::new()
            .tags(["users"])
            .summary("List users")
            .query::<ListQuery>()
            .response::<Vec<User>>(),
    )?;
    doc.register_typed(
        &base,
        "/users",
        HttpMethod::Post,
        &MethodSpec::new()
            .tags(["users"])
            .summary("Create a user")
            .json::<CreateUser>()
            .response::<User>(),
    )?;
    doc.register_typed(
        &users,
        "/:id",
        HttpMethod::Get,
        &MethodSpec::new()
            .tags(["users"])
            .summary("Show a user")
            .path::<IdPath>()
            .response::<User>(),
    )?;
    doc.register_from_doc(&users, "/:id", HttpMethod::Delete, "users.yaml:delete")?;
    doc.register_from_doc(
        &users,
        "/:id/avatar",
        HttpMethod::Put,
        "users.yaml:upload_avatar",
    )?;
    doc.register_typed(
        &auth,
        "login",
        HttpMethod::Post,
        &MethodSpec::new()
            .tags(["auth"])
            .description("Exchange credentials for a session cookie")
            .form::<LoginForm>()
            .response::<SuccessResp>(),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_demo_registrations() {
        let config = Config {
            base_path: "/api/v1".to_string(),
            ..Default::default()
        };
        let mut doc = ApiDoc::new(config, embedded_docs).unwrap();
        register(&mut doc).unwrap();

        let paths = doc.registry().snapshot();
        let keys: Vec<_> = paths.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["/auth/login", "/users", "/users/{id}", "/users/{id}/avatar"]
        );

        let show = paths["/users/{id}"].get_method(HttpMethod::Get).unwrap();
        let user = show.responses[&200].schema.as_ref().unwrap();
        assert_eq!(user.properties["avatar"].schema_type, "string");
        assert!(user.properties.contains_key("created_at"));
        assert!(!user.properties.contains_key("PasswordHash"));

        let delete = paths["/users/{id}"].get_method(HttpMethod::Delete).unwrap();
        assert_eq!(delete.summary, "Delete a user");
    }

    #[test]
    fn test_unknown_embedded_doc() {
        assert!(embedded_docs("orders.yaml").is_err());
    }
}
