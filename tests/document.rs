//! Tests for exporting and importing portable mapping documents.
mod common;
use chrono::{TimeZone, Utc};
use common::*;
use schema_mapper::document::{self, AnyField, EndpointDescriptor, MAPPING_DOCUMENT_VERSION};
use schema_mapper::prelude::*;
use serde_json::json;

fn endpoint_pairs(graph: &MappingGraph) -> Vec<(Endpoint, Endpoint)> {
    graph
        .connections()
        .iter()
        .map(|c| (c.from.clone(), c.to.clone()))
        .collect()
}

fn chained_graph() -> MappingGraph {
    let mut graph = create_simple_graph();
    let total = add_wired_transform(
        &mut graph,
        TransformKind::Math,
        &["SourceData.Order.TotalAmount", "SourceData.Order.Shipping"],
        &["DestinationData.Transaction.Amount"],
    );
    let text = add_wired_transform(
        &mut graph,
        TransformKind::Conversion,
        &[],
        &["DestinationData.Transaction.AmountText"],
    );
    graph.add_connection(right(total), left(text)).unwrap();
    graph.move_transform(total, Position::new(310.0, 120.0));
    graph
}

#[test]
fn test_export_import_round_trip() {
    let graph = chained_graph();
    let timestamp = Utc.with_ymd_and_hms(2025, 10, 14, 9, 30, 0).unwrap();

    let json = document::export_at(&graph, timestamp).to_json_pretty().unwrap();
    let parsed = MappingDocument::from_json(&json).unwrap();
    let mut restored = MappingGraph::new();
    let report = document::import(&parsed, &mut restored, &AnyField);

    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
    assert_eq!(parsed.timestamp, Some(timestamp));
    assert_eq!(endpoint_pairs(&restored), endpoint_pairs(&graph));
    assert_eq!(restored.transforms(), graph.transforms());
}

#[test]
fn test_round_tripped_mapping_executes_identically() {
    let graph = chained_graph();
    let parsed = MappingDocument::from_json(&document::export(&graph).to_json_pretty().unwrap()).unwrap();
    let mut restored = MappingGraph::new();
    document::import(&parsed, &mut restored, &AnyField);

    let executor = Executor::default();
    assert_eq!(
        executor.execute(&restored, &sample_input()).unwrap().output,
        executor.execute(&graph, &sample_input()).unwrap().output
    );
}

#[test]
fn test_exported_document_shape() {
    let mut graph = MappingGraph::new();
    let id = graph
        .add_transform(TransformKind::String, Some(Position::new(10.0, 20.0)), None)
        .unwrap();
    graph
        .add_connection(src("SourceData.Customer.FirstName"), left(id))
        .unwrap();
    let timestamp = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

    let value = serde_json::to_value(document::export_at(&graph, timestamp)).unwrap();

    assert_eq!(
        value,
        json!({
            "version": MAPPING_DOCUMENT_VERSION,
            "timestamp": "2025-01-02T03:04:05Z",
            "mappings": [{
                "source": { "type": "field", "path": "SourceData.Customer.FirstName", "schema": "source" },
                "target": { "type": "functoid", "functoidId": id, "connectorSide": "left" }
            }],
            "functoids": [{ "id": id, "type": "string", "position": { "x": 10.0, "y": 20.0 } }]
        })
    );
}

#[test]
fn test_unplaced_transform_omits_position() {
    let mut graph = MappingGraph::new();
    let placed = graph
        .add_transform(TransformKind::Math, Some(Position::new(5.0, 6.0)), None)
        .unwrap();
    let unplaced = graph.add_transform(TransformKind::Logical, None, None).unwrap();

    let value = serde_json::to_value(document::export(&graph)).unwrap();
    assert_eq!(value["functoids"][0]["position"], json!({ "x": 5.0, "y": 6.0 }));
    assert!(value["functoids"][1].get("position").is_none());

    let mut restored = MappingGraph::new();
    let parsed: MappingDocument = serde_json::from_value(value).unwrap();
    document::import(&parsed, &mut restored, &AnyField);
    assert_eq!(restored.transform(placed).unwrap().position, Some(Position::new(5.0, 6.0)));
    assert_eq!(restored.transform(unplaced).unwrap().position, None);
}

#[test]
fn test_import_skips_deleted_field_paths() {
    let json = r#"{
        "version": "1.0",
        "mappings": [
            {
                "source": { "type": "field", "path": "SourceData.Customer.Fax", "schema": "source" },
                "target": { "type": "field", "path": "DestinationData.Contact.PhoneNumber", "schema": "dest" }
            },
            {
                "source": { "type": "field", "path": "SourceData.Customer.Phone", "schema": "source" },
                "target": { "type": "field", "path": "DestinationData.Contact.PhoneNumber", "schema": "dest" }
            }
        ]
    }"#;
    let schemas = MappingSchemas::new(source_schema(), destination_schema());
    let mut graph = MappingGraph::new();

    let report = document::import(&MappingDocument::from_json(json).unwrap(), &mut graph, &schemas);

    assert_eq!(report.connections.len(), 1);
    assert_eq!(graph.len(), 1);
    assert!(matches!(
        report.warnings.as_slice(),
        [ImportWarning::UnresolvedConnectorReference { index: 0, .. }]
    ));
}

#[test]
fn test_import_skips_unknown_transform_types() {
    let json = r#"{
        "version": "1.0",
        "functoids": [
            { "id": 3, "type": "regex", "position": { "x": 0, "y": 0 } },
            { "id": 4, "type": "logical" }
        ],
        "mappings": [
            {
                "source": { "type": "field", "path": "SourceData.Customer.Email", "schema": "source" },
                "target": { "type": "functoid", "functoidId": 3, "connectorSide": "left" }
            },
            {
                "source": { "type": "functoid", "functoidId": 4, "connectorSide": "right" },
                "target": { "type": "field", "path": "DestinationData.Contact.EmailAddress", "schema": "dest" }
            }
        ]
    }"#;
    let mut graph = MappingGraph::new();

    let report = document::import(&MappingDocument::from_json(json).unwrap(), &mut graph, &AnyField);

    assert_eq!(report.transforms, vec![4]);
    assert_eq!(report.connections.len(), 1);
    assert_eq!(report.warnings.len(), 2);
    assert!(matches!(
        report.warnings[0],
        ImportWarning::UnknownTransformKind { id: 3, .. }
    ));
    assert!(matches!(
        report.warnings[1],
        ImportWarning::UnresolvedConnectorReference { index: 0, .. }
    ));
    assert_eq!(graph.transform(4).unwrap().position, None);
}

#[test]
fn test_import_reports_missing_functoid_id_and_self_connections() {
    let json = r#"{
        "version": "1.0",
        "functoids": [ { "id": 0, "type": "string" }, { "id": 0, "type": "math" } ],
        "mappings": [
            {
                "source": { "type": "functoid", "functoidId": null, "connectorSide": "right" },
                "target": { "type": "field", "path": "DestinationData.Contact.FullName", "schema": "dest" }
            },
            {
                "source": { "type": "functoid", "functoidId": 0, "connectorSide": "left" },
                "target": { "type": "functoid", "functoidId": 0, "connectorSide": "left" }
            }
        ]
    }"#;
    let mut graph = MappingGraph::new();

    let report = document::import(&MappingDocument::from_json(json).unwrap(), &mut graph, &AnyField);

    assert!(graph.connections().is_empty());
    assert_eq!(graph.transform(0).map(|t| t.kind), Some(TransformKind::String));
    assert_eq!(
        report.warnings,
        vec![
            ImportWarning::DuplicateTransform(0),
            ImportWarning::UnresolvedConnectorReference {
                index: 0,
                reason: "functoid reference has no id".to_string()
            },
            ImportWarning::SelfConnection { index: 1 },
        ]
    );
}

#[test]
fn test_import_skips_functoid_id_at_upper_bound() {
    let json = r#"{
        "version": "1.0",
        "functoids": [
            { "id": 18446744073709551615, "type": "math", "position": { "x": 0, "y": 0 } },
            { "id": 2, "type": "string" }
        ]
    }"#;
    let mut graph = MappingGraph::new();

    let report = document::import(&MappingDocument::from_json(json).unwrap(), &mut graph, &AnyField);

    assert_eq!(report.transforms, vec![2]);
    assert_eq!(
        report.warnings,
        vec![ImportWarning::TransformIdOutOfRange(u64::MAX)]
    );
    assert_eq!(graph.add_transform(TransformKind::Logical, None, None), Ok(3));
}

#[test]
fn test_import_replaces_existing_mapping_and_keeps_ids_fresh() {
    let mut graph = create_simple_graph();
    let exported = document::export(&chained_graph());

    document::import(&exported, &mut graph, &AnyField);
    let next = graph.add_transform(TransformKind::Logical, None, None).unwrap();

    assert_eq!(endpoint_pairs(&graph).len(), endpoint_pairs(&chained_graph()).len());
    assert!(exported.functoids.iter().all(|f| f.id < next));
}

#[test]
fn test_version_check() {
    let err = MappingDocument::from_json(r#"{ "version": "2.0" }"#).unwrap_err();
    assert_eq!(err, DocumentError::UnsupportedVersion("2.0".to_string()));

    let minor = MappingDocument::from_json(r#"{ "version": "1.4" }"#).unwrap();
    assert!(minor.mappings.is_empty());
    assert!(minor.functoids.is_empty());
    assert_eq!(minor.timestamp, None);
}

#[test]
fn test_malformed_document_is_rejected() {
    assert!(matches!(
        MappingDocument::from_json("[]"),
        Err(DocumentError::InvalidMappingJson(_))
    ));
    assert!(matches!(
        MappingDocument::from_json(r#"{ "version": "1.0", "mappings": [ { "source": { "type": "wire" } } ] }"#),
        Err(DocumentError::InvalidMappingJson(_))
    ));
}

#[test]
fn test_endpoint_descriptor_tags() {
    let field: EndpointDescriptor =
        serde_json::from_value(json!({ "type": "field", "path": "A.B", "schema": "dest" })).unwrap();
    assert_eq!(
        field,
        EndpointDescriptor::Field {
            path: "A.B".to_string(),
            schema: Side::Destination
        }
    );
}
