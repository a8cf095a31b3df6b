/// Integration tests for the extension configuration registry
///
/// These tests verify that the registry:
/// - Forwards schema resources read from disk to the schema builder
/// - Reports missing or undecodable resources without forwarding anything
/// - Keeps loader registrations consistent under concurrent writers

mod configuration_tests {
    use gqlext::loader::{BatchLoaderHandle, DataLoaderHandle, DataLoaderOptions, LoaderContext};
    use gqlext::{DynamicSchemaBuilder, ExtensionError, SchemaExtensionConfiguration};
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn schema_dir(files: &[(&str, &[u8])]) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).expect("Failed to write resource");
        }
        dir
    }

    fn extension() -> SchemaExtensionConfiguration<DynamicSchemaBuilder> {
        SchemaExtensionConfiguration::new(DynamicSchemaBuilder::new())
    }

    #[test]
    fn test_schema_resource_from_directory() {
        let _ = tracing_subscriber::fmt::try_init();

        let dir = schema_dir(&[("schema.graphqls", b"loaded")]);
        let mut extension = extension();
        extension
            .schema_resource(dir.path(), "/schema.graphqls")
            .expect("Failed to load schema resource");

        assert_eq!(extension.schema_builder().documents(), ["loaded".to_string()]);
    }

    #[test]
    fn test_missing_schema_resource() {
        let dir = schema_dir(&[]);
        let mut extension = extension();

        match extension.schema_resource(dir.path(), "/missing.graphqls") {
            Err(ExtensionError::Resource { name, source }) => {
                assert_eq!(name, "/missing.graphqls");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("missing resource should fail"),
        }

        assert!(extension.schema_builder().documents().is_empty());
    }

    #[test]
    fn test_schema_resource_must_be_utf8() {
        let dir = schema_dir(&[("broken.graphqls", &[0xff, 0xfe, 0x00])]);
        let mut extension = extension();

        match extension.schema_resource(dir.path(), "broken.graphqls") {
            Err(ExtensionError::Resource { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("invalid UTF-8 should fail"),
        }

        assert!(extension.schema_builder().documents().is_empty());
    }

    #[test]
    fn test_resources_from_several_files_build_one_schema() {
        let dir = schema_dir(&[
            ("base.graphqls", b"type Query { version: String }"),
            ("users.graphqls", b"type User { id: ID! }\nextend type Query { user(id: ID!): User }"),
        ]);

        let mut extension = extension();
        extension
            .schema_resource(dir.path(), "/base.graphqls")
            .and_then(|e| e.schema_resource(dir.path(), "/users.graphqls"))
            .expect("Failed to load schema resources");

        let sdl = extension
            .schema_builder()
            .finish()
            .expect("Failed to build schema")
            .sdl();
        assert!(sdl.contains("user(id: ID!): User"));
        assert!(sdl.contains("version: String"));
    }

    #[test]
    fn test_concurrent_registration_keeps_every_key() {
        let extension = extension();

        std::thread::scope(|scope| {
            for thread in 0..8 {
                let extension = &extension;
                scope.spawn(move || {
                    for i in 0..50 {
                        let key = format!("loader-{}-{}", thread, i);
                        extension.data_loader(&key, DataLoaderHandle::new(i));
                        extension.batch_loader(
                            &key,
                            BatchLoaderHandle::from_builder(|_: &DataLoaderOptions| {
                                DataLoaderHandle::new(())
                            }),
                        );
                    }
                });
            }
        });

        let data_loaders = extension.data_loaders();
        let batch_loaders = extension.batch_loaders();
        assert_eq!(data_loaders.len(), 400);
        assert_eq!(batch_loaders.len(), 400);
        assert_eq!(data_loaders.get("loader-7-49").unwrap().downcast_ref::<i32>(), Some(&49));
        assert!(batch_loaders.contains_key("loader-0-0"));
    }

    #[test]
    fn test_concurrent_writes_to_one_key_leave_one_entry() {
        let extension = extension();

        std::thread::scope(|scope| {
            for thread in 0..8_u8 {
                let extension = &extension;
                scope.spawn(move || {
                    extension.data_loader("shared", DataLoaderHandle::new(thread));
                    extension.data_loader_builder("shared", move |_: &DataLoaderOptions| {
                        DataLoaderHandle::new(thread)
                    });
                });
            }
        });

        let data_loaders = extension.data_loaders();
        assert_eq!(data_loaders.len(), 1);
        assert!(data_loaders.get("shared").unwrap().downcast_ref::<u8>().is_some());

        let batch_loaders = extension.batch_loaders();
        assert_eq!(batch_loaders.len(), 1);
        let instance = batch_loaders
            .get("shared")
            .unwrap()
            .instantiate(&DataLoaderOptions::default(), &LoaderContext::empty());
        assert!(instance.downcast_ref::<u8>().is_some());
    }

    #[test]
    fn test_same_key_in_both_maps_is_independent() {
        let extension = extension();
        extension
            .data_loader("users", DataLoaderHandle::new(1_u8))
            .data_loader_builder("users", |options: &DataLoaderOptions| {
                DataLoaderHandle::new(options.max_batch_size)
            });

        assert!(extension.data_loaders().contains_key("users"));
        assert!(extension.batch_loaders().contains_key("users"));
    }
}
