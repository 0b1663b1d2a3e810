//! From an API description file and a TOML config to written classes.

use apisynth_composition::FixedResolver;
use apisynth_core::{ConflictPolicy, EndpointCatalog, HttpMethod, SynthConfig, SynthesisEngine};
use apisynth_test_utils::{method_names, TestTree};
use pretty_assertions::assert_eq;

const PETSTORE: &str = r#"{
  "openapi": "3.0.1",
  "servers": [{ "url": "https://petstore3.example/api/v3" }],
  "paths": {
    "/pet": {
      "put": {},
      "post": {}
    },
    "/pet/findByStatus": {
      "get": {
        "parameters": [
          { "name": "status", "in": "query" }
        ]
      }
    },
    "/pet/{petId}": {
      "get": {},
      "delete": {},
      "patch": {}
    }
  }
}"#;

#[test]
fn openapi_file_to_classes() {
    let tree = TestTree::new();
    let description_path = tree.root().join("petstore.json");
    std::fs::write(&description_path, PETSTORE).unwrap();
    let src = tree.root().join("src");

    let catalog = EndpointCatalog::from_path(&description_path).unwrap();
    let config = SynthConfig::default().with_test_source_dir(&src);
    let report = SynthesisEngine::new(config).run(&catalog, &mut FixedResolver::decline_all());

    assert!(report.is_success());
    let order: Vec<HttpMethod> = report.groups.iter().map(|g| g.method).collect();
    assert_eq!(
        order,
        vec![HttpMethod::Put, HttpMethod::Post, HttpMethod::Get, HttpMethod::Delete]
    );

    let get = std::fs::read_to_string(src.join("org/example/GETTests.java")).unwrap();
    assert!(get.contains("super(\"https://petstore3.example/api/v3\");"));
    assert!(get.contains("queryParams.put(\"status\", \"sampleValue\");"));
    assert!(get.contains("Response response = getRequest(\"/pet/findByStatus\", queryParams);"));
    assert_eq!(
        method_names(&get, "GETTests"),
        vec!["testGET_pet_findByStatus", "testGET_pet_petId_"]
    );

    let delete = std::fs::read_to_string(src.join("org/example/DELETETests.java")).unwrap();
    assert!(delete.contains("Response response = deleteRequest(\"/pet/{petId}\", bodyParams);"));
}

#[test]
fn toml_config_shapes_output() {
    let tree = TestTree::new();
    let config_path = tree.root().join("apisynth.toml");
    let out = tree.root().join("generated");
    std::fs::write(
        &config_path,
        format!(
            "test_source_dir = {out:?}\n\
             package_name = \"com.acme.api\"\n\
             base_url = \"http://127.0.0.1:8080\"\n\
             base_client = \"ApiClient\"\n\
             base_client_package = \"com.acme.support\"\n\
             on_conflict = \"accept\"\n",
            out = out.display().to_string()
        ),
    )
    .unwrap();

    let config = SynthConfig::from_toml_file(&config_path).unwrap();
    assert_eq!(config.on_conflict, ConflictPolicy::Accept);

    let catalog = EndpointCatalog::from_document(PETSTORE, apisynth_core::DocumentFormat::Json)
        .unwrap();
    SynthesisEngine::new(config).run(&catalog, &mut FixedResolver::accept_all());

    let post = std::fs::read_to_string(out.join("com/acme/api/POSTTests.java")).unwrap();
    assert!(post.starts_with("package com.acme.api;\n"));
    assert!(post.contains("import com.acme.support.ApiClient;"));
    assert!(post.contains("public class POSTTests extends ApiClient {"));
    assert!(post.contains("super(\"http://127.0.0.1:8080\");"));
}
