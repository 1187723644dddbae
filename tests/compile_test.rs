use selq::prelude::*;

fn fixture_oracle() -> SchemaIndex {
    let mut index = SchemaIndex::new();
    index.add_field("Query", FieldInfo::object("me", "User"));
    index.add_field(
        "Query",
        FieldInfo::object("user", "User")
            .arg("id", TypeRef::scalar("Int").required())
            .arg("status", TypeRef::enum_type("Status").required()),
    );
    index.add_field("User", FieldInfo::scalar("name", "String"));
    index.add_field("User", FieldInfo::scalar("email", "String"));
    index.add_field("User", FieldInfo::object("friends", "User").list());
    index.add_field(
        "Mutation",
        FieldInfo::object("delete_user", "User").arg("id", TypeRef::scalar("ID").required()),
    );
    index.add_enum("Status", "Status");
    index
}

fn compile_one(source: &str) -> (CompiledOperation, DiagnosticSink, QueryRegistry) {
    let oracle = fixture_oracle();
    let registry = QueryRegistry::new();
    let session = CompileSession::new(&oracle, &registry);
    let sink = session.sink();
    let candidate = parse_candidate(source, &sink)
        .expect("call site parses")
        .expect("call site classifies");
    let operation = session.compile(&candidate).expect("compiles");
    (operation, sink, registry)
}

#[test]
fn scalar_leaves_compile_one_token_per_leaf_in_source_order() {
    let (operation, sink, _) = compile_one("client.query(|x| (x.a, x.b.c))");
    assert!(sink.is_empty());
    assert_eq!(operation.body, "a b { c }");
    assert_eq!(operation.document, "query { a b { c } }");
}

#[test]
fn pascal_case_members_lower_camel_case() {
    let (operation, sink, _) = compile_one("client.query(|x| x.GetName)");
    assert!(sink.is_empty());
    assert_eq!(operation.document, "query { getName }");
}

#[test]
fn nested_selection_scoping_and_shadowing() {
    let (operation, sink, _) = compile_one("client.query(|f| f.me(|f| f.friends(|f| f.name)))");
    assert!(sink.is_empty());
    assert_eq!(operation.document, "query { me { friends { name } } }");
    validate_document(&operation.document).expect("valid GraphQL");
}

#[test]
fn variables_declare_and_substitute() {
    let (operation, sink, _) = compile_one(
        "client.query(Vars { user_id: 5, status: Status::Active }, \
         |vars, q| q.user(vars.user_id, vars.status, |u| u.name()))",
    );
    assert!(sink.is_empty());
    assert_eq!(
        operation.document,
        "query ($userId: Int!, $status: Status!) { user(id: $userId, status: $status) { name } }"
    );
    validate_document(&operation.document).expect("valid GraphQL");
}

#[test]
fn compiling_the_same_call_site_twice_is_byte_identical() {
    let source = "client.query(|q| q.me(|m| (m.name, m.email)))";
    let (first, _, _) = compile_one(source);
    let (second, _, _) = compile_one(source);
    assert_eq!(first.document, second.document);
    assert_eq!(first.hash, second.hash);
    assert_eq!(first.key, second.key);
}

#[test]
fn out_of_scope_reference_is_isolated_to_its_call_site() {
    let oracle = fixture_oracle();
    let registry = QueryRegistry::new();
    let session = CompileSession::new(&oracle, &registry);
    let sink = session.sink();

    let broken = parse_candidate("client.query(|q| captured.name)", &sink)
        .unwrap()
        .unwrap();
    let healthy = parse_candidate("client.query(|q| q.me(|m| m.name))", &sink)
        .unwrap()
        .unwrap();
    let operations = session.compile_all(&[broken, healthy]).unwrap();

    let diagnostics = sink.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0].kind,
        DiagnosticKind::OutOfScopeReference { ref name, .. } if name == "captured"
    ));
    // The placeholder points at the offending base identifier.
    assert!(
        operations[0]
            .document
            .contains("// Failed to generate query for: captured")
    );
    assert!(validate_document(&operations[0].document).is_err());
    assert_eq!(operations[1].document, "query { me { name } }");
    validate_document(&operations[1].document).expect("healthy call site unaffected");
}

#[test]
fn textually_identical_documents_register_once() {
    let oracle = fixture_oracle();
    let registry = QueryRegistry::new();
    let session = CompileSession::new(&oracle, &registry);
    let sink = session.sink();

    let sources = [
        "client.query(|q| q.me(|m| m.name))",
        "client.query(|u| u.me(|x| x.name))",
        "client.query(|q| q.me(|m| m.email))",
    ];
    let candidates: Vec<Candidate> = sources
        .iter()
        .map(|s| parse_candidate(s, &sink).unwrap().unwrap())
        .collect();
    let operations = session.compile_all(&candidates).unwrap();

    assert_eq!(operations[0].hash, operations[1].hash);
    assert_ne!(operations[0].hash, operations[2].hash);
    assert_eq!(registry.len(), 2);

    // The first call site's registration is the one that survives.
    let info = registry.get(&operations[0].key).expect("registered");
    assert_eq!(info.query, "query { me { name } }");
    assert_eq!(info.hash, operations[0].hash);
}

#[test]
fn registry_serves_the_runtime_client_by_key() {
    let (operation, _, registry) =
        compile_one("client.mutation(\"Delete\", |m| m.delete_user(5, |u| u.name()))");
    registry.seal();

    let info = registry.get(&operation.key).expect("registered by key");
    assert_eq!(info.operation_type, OperationKind::Mutation);
    assert_eq!(info.query, "mutation Delete { deleteUser(id: 5) { name } }");
    assert_eq!(info.query_body, "deleteUser(id: 5) { name }");

    // Startup is over; late registration is an error, reads are not.
    assert!(matches!(
        registry.register("late", info.clone()),
        Err(SelqError::RegistrySealed)
    ));
    let snapshot = registry.to_json().expect("serializes");
    assert!(snapshot.contains("mutation Delete"));
}

#[test]
fn unsupported_variables_shape_degrades_without_aborting() {
    let (operation, sink, _) =
        compile_one("client.query(build_vars(), |vars, q| q.me(|m| m.name))");
    let diagnostics = sink.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnsupportedVariablesShape);
    // Variables dropped, selection still compiled.
    assert_eq!(operation.document, "query { me { name } }");
    assert!(operation.variables.is_empty());
}

#[test]
fn every_clean_document_parses_as_graphql() {
    let sources = [
        "client.query(|q| q.me(|m| (m.name, m.email)))",
        "client.query(|q| q.user(5, Status::Active, |u| u.friends(|f| f.name)))",
        "client.query(\"Named\", |q| q.me(|m| m.name))",
        "client.mutation(|m| m.delete_user(5, |u| u.name()))",
    ];
    for source in sources {
        let (operation, sink, _) = compile_one(source);
        assert!(
            sink.is_empty(),
            "diagnostics for {}: {:?}",
            source,
            sink.snapshot()
        );
        validate_operation(&operation)
            .unwrap_or_else(|e| panic!("{} produced invalid GraphQL: {}", source, e));
    }
}
