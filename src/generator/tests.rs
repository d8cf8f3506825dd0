use std::fs;

use super::*;
use crate::config::ProcessorConfig;
use crate::scan::{classify_trait, RouteGroupDecl};

fn decl(source: &str, package: &str) -> RouteGroupDecl {
    let item: syn::ItemTrait = syn::parse_str(source).expect("fixture must parse");
    classify_trait(&item, package).expect("fixture must classify")
}

#[test]
fn base_is_emitted_for_group_marked_interface() {
    let tmp = tempfile::tempdir().unwrap();
    let d = decl(
        r#"
        #[http_exchange("/api")]
        pub trait UserApi {
            #[get_exchange("/users/{id}")]
            fn get_user(&self, id: i64) -> Result<User, ExchangeError>;
        }
        "#,
        "example.api",
    );
    let out = generate_bases(&[d], &ProcessorConfig::default(), tmp.path()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "UserApiBase");
    assert_eq!(out[0].stub_count, 1);

    let text = fs::read_to_string(&out[0].path).unwrap();
    assert!(text.contains("pub trait UserApiBase"));
    assert!(text.contains("fn get_user(&self, id: i64) -> Result<User, ExchangeError>"));
    assert!(text.contains("ExchangeError::not_implemented(\"UserApi::get_user\")"));
}

#[test]
fn no_output_without_marker_or_matched_method() {
    let tmp = tempfile::tempdir().unwrap();
    let d = decl(
        r#"
        pub trait Helper {
            fn assist(&self) -> bool;
        }
        "#,
        "example",
    );
    let out = generate_bases(&[d], &ProcessorConfig::default(), tmp.path()).unwrap();
    assert!(out.is_empty());
    assert!(!tmp.path().join("example").exists());
}

#[test]
fn default_bodied_method_is_not_synthesized() {
    let tmp = tempfile::tempdir().unwrap();
    let d = decl(
        r#"
        #[http_exchange]
        pub trait MixedApi {
            #[get_exchange("/a")]
            fn real(&self) -> Result<(), Error>;
            #[get_exchange("/b")]
            fn already_done(&self) -> Result<(), Error> { Ok(()) }
        }
        "#,
        "example",
    );
    let out = generate_bases(&[d], &ProcessorConfig::default(), tmp.path()).unwrap();
    assert_eq!(out[0].stub_count, 1);
    let text = fs::read_to_string(&out[0].path).unwrap();
    assert!(text.contains("fn real(&self)"));
    assert!(!text.contains("already_done"));
}

#[test]
fn visibility_mirrors_the_origin() {
    let tmp = tempfile::tempdir().unwrap();
    let d = decl(
        r#"
        #[http_exchange]
        trait InternalApi {
            #[get_exchange("/x")]
            fn x(&self) -> Result<(), Error>;
        }
        "#,
        "example",
    );
    let out = generate_bases(&[d], &ProcessorConfig::default(), tmp.path()).unwrap();
    let text = fs::read_to_string(&out[0].path).unwrap();
    assert!(text.contains("\ntrait InternalApiBase"));
    assert!(!text.contains("pub trait InternalApiBase"));
}

#[test]
fn name_collision_aborts_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    // Two declarations resolving to the same generated name in the same
    // package collide.
    let a = decl(
        r#"
        #[http_exchange]
        pub trait Foo {
            #[get_exchange("/a")]
            fn a(&self) -> Result<(), Error>;
        }
        "#,
        "example",
    );
    let mut b = a.clone();
    b.name = "Foo".into();
    let cfg = ProcessorConfig {
        suffix: "X".into(),
        ..ProcessorConfig::default()
    };
    let err = generate_bases(&[a, b], &cfg, tmp.path()).unwrap_err();
    assert!(err.to_string().contains("collision"));
    assert!(
        !tmp.path().join("example").exists(),
        "nothing is written when the pass aborts"
    );
}

#[test]
fn output_subpackage_extends_the_package_path() {
    let tmp = tempfile::tempdir().unwrap();
    let d = decl(
        r#"
        #[http_exchange]
        pub trait PetApi {
            #[get_exchange("/pets")]
            fn pets(&self) -> Result<Vec<Pet>, Error>;
        }
        "#,
        "example.api",
    );
    let cfg = ProcessorConfig {
        output_subpackage: "generated".into(),
        ..ProcessorConfig::default()
    };
    let out = generate_bases(&[d], &cfg, tmp.path()).unwrap();
    assert_eq!(out[0].package, "example.api.generated");
    assert!(out[0]
        .path
        .ends_with("example/api/generated/pet_api_base.rs"));

    let mod_rs = fs::read_to_string(
        tmp.path().join("example/api/generated/mod.rs"),
    )
    .unwrap();
    assert!(mod_rs.contains("pub mod pet_api_base;"));
}

#[test]
fn disabled_config_generates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let d = decl(
        r#"
        #[http_exchange]
        pub trait UserApi {
            #[get_exchange("/u")]
            fn u(&self) -> Result<(), Error>;
        }
        "#,
        "example",
    );
    let cfg = ProcessorConfig {
        enabled: false,
        ..ProcessorConfig::default()
    };
    let out = generate_bases(&[d], &cfg, tmp.path()).unwrap();
    assert!(out.is_empty());
}
