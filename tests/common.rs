//! Common test utilities for building schemas, graphs and input documents.
use schema_mapper::prelude::*;
use serde_json::{Value, json};

#[allow(dead_code)]
pub const SOURCE_SCHEMA_JSON: &str = r#"{
    "name": "SourceData",
    "type": "root",
    "children": [
        {
            "name": "Customer",
            "type": "parent",
            "children": [
                { "name": "CustomerID", "type": "field", "dataType": "string" },
                { "name": "Title", "type": "field", "dataType": "string" },
                { "name": "FirstName", "type": "field", "dataType": "string" },
                { "name": "LastName", "type": "field", "dataType": "string" },
                { "name": "Email", "type": "field", "dataType": "string" },
                { "name": "Phone", "type": "field", "dataType": "string" },
                { "name": "Address", "type": "field", "dataType": "string" },
                { "name": "City", "type": "field", "dataType": "string" },
                { "name": "ZipCode", "type": "field", "dataType": "string" }
            ]
        },
        {
            "name": "Order",
            "type": "parent",
            "children": [
                { "name": "OrderID", "type": "field", "dataType": "string" },
                { "name": "OrderDate", "type": "field", "dataType": "string" },
                { "name": "TotalAmount", "type": "field", "dataType": "number" },
                { "name": "Shipping", "type": "field", "dataType": "number" },
                { "name": "Status", "type": "field", "dataType": "string" }
            ]
        }
    ]
}"#;

#[allow(dead_code)]
pub const DESTINATION_SCHEMA_JSON: &str = r#"{
    "name": "DestinationData",
    "type": "root",
    "children": [
        {
            "name": "Contact",
            "type": "parent",
            "children": [
                { "name": "RecordID", "type": "field", "dataType": "string" },
                { "name": "FullName", "type": "field", "dataType": "string" },
                { "name": "EmailAddress", "type": "field", "dataType": "string", "required": true },
                { "name": "PhoneNumber", "type": "field", "dataType": "string" },
                {
                    "name": "Location",
                    "type": "parent",
                    "children": [
                        { "name": "StreetAddress", "type": "field", "dataType": "string" },
                        { "name": "CityName", "type": "field", "dataType": "string" },
                        { "name": "FullAddress", "type": "field", "dataType": "string" }
                    ]
                }
            ]
        },
        {
            "name": "Transaction",
            "type": "parent",
            "children": [
                { "name": "TransactionID", "type": "field", "dataType": "string" },
                { "name": "Date", "type": "field", "dataType": "date", "format": "yyyy-MM-dd" },
                { "name": "Amount", "type": "field", "dataType": "number" },
                { "name": "AmountText", "type": "field", "dataType": "string" },
                { "name": "TransactionStatus", "type": "field", "dataType": "string" }
            ]
        }
    ]
}"#;

#[allow(dead_code)]
pub fn source_schema() -> SchemaNode {
    SchemaNode::from_json(SOURCE_SCHEMA_JSON).expect("sample source schema is valid")
}

#[allow(dead_code)]
pub fn destination_schema() -> SchemaNode {
    SchemaNode::from_json(DESTINATION_SCHEMA_JSON).expect("sample destination schema is valid")
}

/// A session over the two sample schemas with an empty mapping.
#[allow(dead_code)]
pub fn sample_session() -> MappingSession {
    MappingSession::new(source_schema(), destination_schema()).expect("sample schemas are valid")
}

/// A source document matching the sample source schema.
#[allow(dead_code)]
pub fn sample_input() -> Value {
    json!({
        "Customer": {
            "CustomerID": "CUST-001",
            "Title": "Mr.",
            "FirstName": "John",
            "LastName": "Smith",
            "Email": "john.smith@example.com",
            "Phone": "+1-555-0123",
            "Address": "123 Main Street",
            "City": "New York",
            "ZipCode": "10001"
        },
        "Order": {
            "OrderID": "ORD-2025-001",
            "OrderDate": "2025-10-14",
            "TotalAmount": 1250.5,
            "Shipping": 20,
            "Status": "Confirmed"
        }
    })
}

#[allow(dead_code)]
pub fn src(path: &str) -> Endpoint {
    Endpoint::source(path).expect("valid source path")
}

#[allow(dead_code)]
pub fn dest(path: &str) -> Endpoint {
    Endpoint::destination(path).expect("valid destination path")
}

#[allow(dead_code)]
pub fn left(id: TransformId) -> Endpoint {
    Endpoint::transform(id, Port::Left)
}

#[allow(dead_code)]
pub fn right(id: TransformId) -> Endpoint {
    Endpoint::transform(id, Port::Right)
}

/// Adds a transform of `kind` fed by `inputs` and writing to `outputs`.
#[allow(dead_code)]
pub fn add_wired_transform(
    graph: &mut MappingGraph,
    kind: TransformKind,
    inputs: &[&str],
    outputs: &[&str],
) -> TransformId {
    let id = graph
        .add_transform(kind, None, None)
        .expect("transform added");
    for input in inputs {
        graph
            .add_connection(src(input), left(id))
            .expect("input connected");
    }
    for output in outputs {
        graph
            .add_connection(right(id), dest(output))
            .expect("output connected");
    }
    id
}

/// A graph with one direct copy and one string transform:
///
/// - `Customer.CustomerID -> Contact.RecordID`
/// - `string(Customer.FirstName, Customer.LastName) -> Contact.FullName`
#[allow(dead_code)]
pub fn create_simple_graph() -> MappingGraph {
    let mut graph = MappingGraph::new();
    graph
        .add_connection(
            src("SourceData.Customer.CustomerID"),
            dest("DestinationData.Contact.RecordID"),
        )
        .expect("direct connection");
    add_wired_transform(
        &mut graph,
        TransformKind::String,
        &["SourceData.Customer.FirstName", "SourceData.Customer.LastName"],
        &["DestinationData.Contact.FullName"],
    );
    graph
}
