//! Integration tests for action derivation.

use std::collections::BTreeSet;

use rest_catalog::{
    build_api_tree, choose_response_type, derive_actions, derive_actions_with, describe_action,
    is_accessor, load_resource_str, render_path, Action, ActionKind, ActionTarget, ContentKind,
    Deferred, DeriveError, DeriveOptions, HttpMethod, LinkToken, ModuleRef, ResolvedType,
    ResolverError, Resource, SetCombinator, TypeRef, TypeResolver,
};

const BLOG: &str = r#"{
    "name": "post",
    "description": "Blog posts",
    "schema": {
        "top_level": { "many": "latest" },
        "step": { "named": [
            { "path": "id", "endpoint": { "single": { "by": { "read": "blog::PostId" } } } },
            { "path": "featured", "endpoint": { "many": { "singleton": "featured" } } },
            { "path": "about", "endpoint": { "static": "about" } },
            { "path": "author", "endpoint": { "many": { "by": { "id": "string", "listing": "by_author" } } } }
        ] }
    },
    "handlers": {
        "list": {
            "outputs": [{ "kind": "json", "type": "List<blog::Post>" }],
            "params": { "params": ["tag"] }
        },
        "get": {
            "outputs": [
                { "kind": "xml", "type": "blog::Post" },
                { "kind": "json", "type": "blog::Post" }
            ],
            "errors": [{ "kind": "xml", "type": "blog::Error" }]
        },
        "update": {
            "inputs": [{ "kind": "json", "type": "blog::Post" }],
            "secure": true
        },
        "remove": {},
        "create": { "inputs": [{ "kind": "json", "type": "blog::Post" }] },
        "statics": { "about": { "outputs": [{ "kind": "plain_text" }] } },
        "selects": [{ "path": "info", "handler": {} }],
        "actions": [{ "path": "publish", "handler": { "params": { "both": [
            { "params": ["at", "notify"] },
            { "params": ["notify"] }
        ] } } }]
    }
}"#;

fn blog() -> Resource {
    load_resource_str(BLOG).unwrap()
}

fn summary(actions: &[Action]) -> Vec<(ActionKind, ActionTarget, HttpMethod, String)> {
    actions
        .iter()
        .map(|a| (a.kind, a.target, a.method, render_path(&a.link)))
        .collect()
}

mod traversal {
    use super::*;

    #[test]
    fn catalogue_order_is_fixed() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        use ActionKind::*;
        use ActionTarget::*;
        assert_eq!(
            summary(&actions),
            vec![
                (List, Itself, HttpMethod::Get, "/".to_string()),
                (Retrieve, Itself, HttpMethod::Get, "/id/{PostId}".to_string()),
                (Update, Itself, HttpMethod::Put, "/id/{PostId}".to_string()),
                (UpdateMany, Itself, HttpMethod::Put, "/id".to_string()),
                (DeleteMany, Itself, HttpMethod::Delete, "/id".to_string()),
                (List, Itself, HttpMethod::Get, "/featured".to_string()),
                (Modify, Any, HttpMethod::Post, "/id/{PostId}/about".to_string()),
                (List, Itself, HttpMethod::Get, "/author/{string}".to_string()),
                (Create, Itself, HttpMethod::Post, "/".to_string()),
                (Delete, Itself, HttpMethod::Delete, "/id/{PostId}".to_string()),
                (Retrieve, Any, HttpMethod::Get, "/id/{PostId}/info".to_string()),
                (Modify, Any, HttpMethod::Post, "/id/{PostId}/publish".to_string()),
            ]
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let resource = blog();
        let first = derive_actions(&resource, &DeriveOptions::new()).unwrap();
        let second = derive_actions(&resource, &DeriveOptions::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn identifiers_only_on_identified_nodes() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        let identified: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.identifier.is_some())
            .map(|(i, _)| i)
            .collect();
        // get and update by id, and the listing by author
        assert_eq!(identified, vec![1, 2, 7]);
    }

    #[test]
    fn postfixed_actions_keep_access_prefix() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        let select = &actions[10];
        assert!(select.postfixed);
        assert_eq!(
            select.link,
            vec![
                LinkToken::Access(vec![
                    LinkToken::Action("id".into()),
                    LinkToken::Param("PostId".into()),
                ]),
                LinkToken::Action("info".into()),
            ]
        );
    }

    #[test]
    fn listing_params_include_paging() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        assert_eq!(actions[0].param_names, vec!["tag", "offset", "count"]);
    }

    #[test]
    fn action_params_are_deduplicated() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        assert_eq!(actions[11].param_names, vec!["at", "notify"]);
    }

    #[test]
    fn secure_flag_follows_handler() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        assert!(actions[2].requires_secure_transport);
        assert!(actions[3].requires_secure_transport);
        assert!(!actions[1].requires_secure_transport);
    }

    #[test]
    fn payload_metadata_is_resolved() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        let list_output = &actions[0].outputs[0];
        assert_eq!(list_output.label, "List<Post>");
        assert_eq!(
            list_output.type_deps,
            BTreeSet::from([ModuleRef("blog".into())])
        );
        let about_output = &actions[6].outputs[0];
        assert_eq!(about_output.kind, ContentKind::PlainText);
        assert_eq!(about_output.label, "String");
    }
}

mod accessors {
    use super::*;

    #[test]
    fn only_plain_gets_are_accessors() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        let accessors: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| is_accessor(a))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(accessors, vec![1]);
    }

    #[test]
    fn descriptions() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        let descriptions: Vec<String> =
            actions.iter().map(|a| describe_action("post", a)).collect();
        assert_eq!(descriptions[0], "List posts");
        assert_eq!(descriptions[1], "Retrieve post data");
        assert_eq!(descriptions[3], "Update many post");
        assert_eq!(descriptions[10], "Retrieve information data");
        assert_eq!(descriptions[11], "Modify information");
    }
}

mod negotiation {
    use super::*;

    #[test]
    fn get_shares_xml_between_channels() {
        let actions = derive_actions(&blog(), &DeriveOptions::new()).unwrap();
        let get = &actions[1];
        let choice = choose_response_type(&get.outputs, &get.errors);
        assert_eq!(choice.output_choice.unwrap().kind, ContentKind::Xml);
        assert_eq!(choice.error_choice.unwrap().label, "Error");
    }

    #[test]
    fn api_tree_entries_carry_negotiation() {
        let tree = build_api_tree(&blog(), &DeriveOptions::new()).unwrap();
        let get = &tree.actions[1];
        assert!(get.accessor);
        assert_eq!(get.response.output_choice.as_ref().unwrap().kind, ContentKind::Xml);
        assert_eq!(get.accept, vec!["text/xml", "text/json"]);

        let about = &tree.actions[6];
        assert_eq!(about.accept, vec!["text/plain", "text/json"]);
    }
}

mod unnamed_steps {
    use super::*;

    #[test]
    fn many_step_never_forces_identifier() {
        let resource = load_resource_str(
            r#"{
                "name": "comment",
                "schema": { "step": { "unnamed": {
                    "id": { "read": "blog::UserId" },
                    "cardinality": { "many": "by_user" }
                } } },
                "handlers": { "list": {} }
            }"#,
        )
        .unwrap();

        let actions = derive_actions(&resource, &DeriveOptions::new()).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::List);
        assert_eq!(actions[0].link, vec![LinkToken::Param("UserId".into())]);
    }

    #[test]
    #[should_panic(expected = "identifier value accessed outside handler context")]
    fn forcing_a_placeholder_fails_loudly() {
        let id: Deferred<String> = Deferred::placeholder();
        id.force();
    }

    #[test]
    fn single_step_yields_identified_actions_without_directory() {
        let resource = load_resource_str(
            r#"{
                "name": "user",
                "schema": { "step": { "unnamed": {
                    "id": "string",
                    "cardinality": { "single": "by_name" }
                } } },
                "handlers": { "get": {}, "selects": [{ "path": "avatar", "handler": {} }] }
            }"#,
        )
        .unwrap();

        let actions = derive_actions(&resource, &DeriveOptions::new()).unwrap();
        assert_eq!(render_path(&actions[0].link), "/{string}");
        assert_eq!(actions[0].directory, "");
        assert_eq!(render_path(&actions[1].link), "/{string}/avatar");
    }
}

mod resolvers {
    use super::*;

    /// Renders every type as a TypeScript-style reference.
    struct TsResolver;

    impl TypeResolver for TsResolver {
        fn resolve(&self, type_name: &str) -> Result<ResolvedType, ResolverError> {
            if type_name.contains('<') {
                return Err(ResolverError::Unresolvable {
                    type_name: type_name.to_string(),
                    message: "generics are not supported".into(),
                });
            }
            let name = type_name.rsplit("::").next().unwrap_or(type_name);
            Ok(ResolvedType {
                type_ref: TypeRef(format!("Ts.{}", name)),
                module_deps: BTreeSet::from([ModuleRef("./types".into())]),
                rendered_name: format!("{}Dto", name),
            })
        }
    }

    #[test]
    fn injected_resolver_shapes_metadata() {
        let mut resource = blog();
        resource.handlers.list = None;

        let actions =
            derive_actions_with(&resource, &DeriveOptions::new(), &TsResolver, &SetCombinator)
                .unwrap();
        let get = &actions[0];
        assert_eq!(get.identifier.as_ref().unwrap().description, "PostIdDto");
        assert_eq!(get.outputs[0].type_ref, Some(TypeRef("Ts.Post".into())));
        assert_eq!(get.outputs[0].label, "PostDto");
    }

    #[test]
    fn resolver_failure_propagates_with_context() {
        let err = derive_actions_with(&blog(), &DeriveOptions::new(), &TsResolver, &SetCombinator)
            .unwrap_err();
        assert!(matches!(
            err,
            DeriveError::Resolver { ref context, .. } if context == "post/list/outputs/0"
        ));
    }

    #[test]
    fn lenient_mode_drops_only_the_failing_payload() {
        let actions = derive_actions_with(
            &blog(),
            &DeriveOptions::new().lenient(true),
            &TsResolver,
            &SetCombinator,
        )
        .unwrap();
        assert_eq!(actions.len(), 12);
        assert!(actions[0].outputs.is_empty());
        assert_eq!(actions[0].param_names, vec!["tag", "offset", "count"]);
    }
}

mod api_tree {
    use super::*;

    #[test]
    fn children_hang_off_parent_access_path() {
        let mut resource = blog();
        resource.children.push(
            load_resource_str(
                r#"{
                    "name": "comment",
                    "schema": { "top_level": { "many": "all" }, "step": { "named": [] } },
                    "handlers": { "list": {}, "create": {} }
                }"#,
            )
            .unwrap(),
        );

        let tree = build_api_tree(&resource, &DeriveOptions::new()).unwrap();
        let comment = &tree.children[0];
        assert_eq!(render_path(&comment.link), "/post/id/{PostId}/comment");
        assert_eq!(comment.actions.len(), 2);
        assert_eq!(comment.actions[1].description, "Create comment");
        assert_eq!(tree.action_count(), 14);
    }
}
