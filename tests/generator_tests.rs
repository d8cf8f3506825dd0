//! End-to-end generation over a real temporary source tree.

use std::fs;

use httpexchange::config::ProcessorConfig;
use httpexchange::generator::generate;
use tempfile::TempDir;

fn write_source(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write source");
}

const USER_API: &str = r#"
#[http_exchange(path = "/api/v1")]
pub trait UserApi {
    #[get_exchange("/users/{id}")]
    fn get_user(&self, id: i64) -> Result<User, ExchangeError>;

    #[post_exchange("/users")]
    fn create_user(&self, #[body] user: User) -> Result<User, ExchangeError>;
}
"#;

#[test]
fn generates_base_modules_for_annotated_traits() {
    let src = TempDir::new().expect("src dir");
    let out = TempDir::new().expect("out dir");
    write_source(&src, "api/user_api.rs", USER_API);

    let generated = generate(src.path(), out.path(), &ProcessorConfig::default())
        .expect("generation succeeds");
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].name, "UserApiBase");
    assert_eq!(generated[0].stub_count, 2);

    let base = fs::read_to_string(&generated[0].path).expect("read generated");
    assert!(base.contains("pub trait UserApiBase"));
    assert!(base.contains("fn get_user(&self, id: i64) -> Result<User, ExchangeError>"));
    assert!(base.contains(r#"not_implemented("UserApi::get_user")"#));

    let mod_rs = fs::read_to_string(generated[0].path.parent().expect("dir").join("mod.rs"))
        .expect("read mod.rs");
    assert!(mod_rs.contains("pub mod user_api_base;"));
}

#[test]
fn prefix_and_suffix_rename_the_generated_trait() {
    let src = TempDir::new().expect("src dir");
    let out = TempDir::new().expect("out dir");
    write_source(&src, "user_api.rs", USER_API);

    let config = ProcessorConfig {
        prefix: "Abstract".into(),
        suffix: String::new(),
        ..ProcessorConfig::default()
    };
    let generated = generate(src.path(), out.path(), &config).expect("generation succeeds");
    assert_eq!(generated[0].name, "AbstractUserApi");
}

#[test]
fn package_filter_excludes_foreign_declarations() {
    let src = TempDir::new().expect("src dir");
    let out = TempDir::new().expect("out dir");
    write_source(&src, "api/user_api.rs", USER_API);
    write_source(
        &src,
        "internal/admin_api.rs",
        r#"
#[http_exchange]
pub trait AdminApi {
    #[delete_exchange("/admin/{id}")]
    fn remove(&self, id: i64) -> Result<(), ExchangeError>;
}
"#,
    );

    let config = ProcessorConfig {
        packages: vec!["api".into()],
        ..ProcessorConfig::default()
    };
    let generated = generate(src.path(), out.path(), &config).expect("generation succeeds");
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].interface, "api.user_api.UserApi");
}

#[test]
fn output_subpackage_nests_generated_modules() {
    let src = TempDir::new().expect("src dir");
    let out = TempDir::new().expect("out dir");
    write_source(&src, "api/user_api.rs", USER_API);

    let config = ProcessorConfig {
        output_subpackage: "generated".into(),
        ..ProcessorConfig::default()
    };
    let generated = generate(src.path(), out.path(), &config).expect("generation succeeds");
    assert_eq!(generated[0].package, "api.user_api.generated");
    assert!(generated[0]
        .path
        .ends_with("api/user_api/generated/user_api_base.rs"));
}

#[test]
fn unparseable_files_are_skipped_not_fatal() {
    let src = TempDir::new().expect("src dir");
    let out = TempDir::new().expect("out dir");
    write_source(&src, "api/user_api.rs", USER_API);
    write_source(&src, "api/broken.rs", "this is not rust {{{");

    let generated = generate(src.path(), out.path(), &ProcessorConfig::default())
        .expect("generation succeeds");
    assert_eq!(generated.len(), 1);
}

#[test]
fn disabled_config_writes_nothing() {
    let src = TempDir::new().expect("src dir");
    let out = TempDir::new().expect("out dir");
    write_source(&src, "user_api.rs", USER_API);

    let config = ProcessorConfig {
        enabled: false,
        ..ProcessorConfig::default()
    };
    let generated = generate(src.path(), out.path(), &config).expect("generation succeeds");
    assert!(generated.is_empty());
    assert_eq!(
        fs::read_dir(out.path()).expect("read out dir").count(),
        0,
        "no files are written when disabled"
    );
}
