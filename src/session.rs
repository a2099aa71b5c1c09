use crate::describe::{self, CancellationFlag, DescriptionOutcome, TextGenerator};
use crate::document::{self, ImportReport, MappingDocument};
use crate::engine::{ExecutionOutcome, Executor};
use crate::error::{DescribeError, DocumentError, ExecutionError, GraphError, SchemaError};
use crate::graph::{ConnectionId, Endpoint, MappingGraph, Position, TransformId, TransformKind};
use crate::path::FieldPath;
use crate::schema::{BusinessMetadata, MappingSchemas, SchemaNode};
use serde_json::Value;
use tracing::{debug, info};

/// One editing session: the two schemas, the mapping graph drawn between
/// them, the executor, and the most recent execution result.
///
/// Every UI handler or collaborator callback receives the session it acts on;
/// nothing is reached through process-wide state.
pub struct MappingSession {
    schemas: MappingSchemas,
    graph: MappingGraph,
    executor: Executor,
    last_outcome: Option<ExecutionOutcome>,
}

impl MappingSession {
    pub fn new(source: SchemaNode, destination: SchemaNode) -> Result<Self, SchemaError> {
        source.validate()?;
        destination.validate()?;
        Ok(Self {
            schemas: MappingSchemas::new(source, destination),
            graph: MappingGraph::new(),
            executor: Executor::default(),
            last_outcome: None,
        })
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn schemas(&self) -> &MappingSchemas {
        &self.schemas
    }

    pub fn graph(&self) -> &MappingGraph {
        &self.graph
    }

    pub fn last_outcome(&self) -> Option<&ExecutionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Replaces both schemas. Either both load or nothing changes. A
    /// successful load starts a fresh mapping.
    pub fn load_schemas(
        &mut self,
        source: SchemaNode,
        destination: SchemaNode,
    ) -> Result<(), SchemaError> {
        source.validate()?;
        destination.validate()?;
        self.schemas = MappingSchemas::new(source, destination);
        self.graph.clear();
        self.last_outcome = None;
        info!(
            source = self.schemas.source.name(),
            destination = self.schemas.destination.name(),
            "schemas loaded"
        );
        Ok(())
    }

    pub fn load_schemas_json(&mut self, source: &str, destination: &str) -> Result<(), SchemaError> {
        let source = SchemaNode::from_json(source)?;
        let destination = SchemaNode::from_json(destination)?;
        self.load_schemas(source, destination)
    }

    /// Seeds the destination schema with a copy of the source schema under
    /// `root_name`. Connections whose destination field no longer exists are
    /// dropped and returned.
    pub fn clone_source_as_destination(
        &mut self,
        root_name: &str,
    ) -> Result<Vec<ConnectionId>, SchemaError> {
        self.schemas.destination = self.schemas.source.clone_with_root_name(root_name)?;
        Ok(self.prune_unresolved())
    }

    fn prune_unresolved(&mut self) -> Vec<ConnectionId> {
        let stale: Vec<ConnectionId> = self
            .graph
            .connections()
            .iter()
            .filter(|c| !self.field_exists(&c.from) || !self.field_exists(&c.to))
            .map(|c| c.id)
            .collect();
        for id in &stale {
            self.graph.remove_connection(*id);
        }
        if !stale.is_empty() {
            debug!(removed = stale.len(), "stale connections pruned");
        }
        stale
    }

    fn field_exists(&self, endpoint: &Endpoint) -> bool {
        match endpoint {
            Endpoint::Field { path, side } => self.schemas.has_field(*side, path),
            Endpoint::Transform { .. } => true,
        }
    }

    /// Connects two endpoints. Field endpoints must name field nodes of the
    /// schema on their side.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<ConnectionId, GraphError> {
        for endpoint in [&from, &to] {
            if let Endpoint::Field { path, side } = endpoint {
                if !self.schemas.has_field(*side, path) {
                    return Err(GraphError::UnknownField {
                        side: *side,
                        path: path.to_string(),
                    });
                }
            }
        }
        self.graph.add_connection(from, to)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        self.graph.remove_connection(id)
    }

    pub fn add_transform(
        &mut self,
        kind: TransformKind,
        position: Option<Position>,
    ) -> Result<TransformId, GraphError> {
        self.graph.add_transform(kind, position, None)
    }

    pub fn move_transform(&mut self, id: TransformId, position: Position) -> bool {
        self.graph.move_transform(id, position)
    }

    pub fn remove_transform(&mut self, id: TransformId) -> Vec<ConnectionId> {
        self.graph.remove_transform(id)
    }

    /// Removes every connection and transform. Callers confirm with the user
    /// before calling this.
    pub fn clear(&mut self) {
        self.graph.clear();
    }

    /// Executes the mapping. On failure the previous result is kept.
    pub fn execute(&mut self, input: &Value) -> Result<&ExecutionOutcome, ExecutionError> {
        let outcome = self
            .executor
            .execute_with_schemas(&self.graph, &self.schemas, input)?;
        info!(
            steps = outcome.trace.steps.len(),
            warnings = outcome.warnings.len(),
            "mapping executed"
        );
        Ok(self.last_outcome.insert(outcome))
    }

    /// Parses `input` and executes the mapping. Unparsable input leaves the
    /// previous result untouched.
    pub fn execute_json(&mut self, input: &str) -> Result<&ExecutionOutcome, ExecutionError> {
        let document: Value = serde_json::from_str(input)
            .map_err(|e| ExecutionError::InvalidInputDocument(e.to_string()))?;
        self.execute(&document)
    }

    pub fn export_mapping(&self) -> MappingDocument {
        document::export(&self.graph)
    }

    /// Replaces the current mapping with `mapping`, resolving field
    /// references against the loaded schemas.
    pub fn import_mapping(&mut self, mapping: &MappingDocument) -> ImportReport {
        let report = document::import(mapping, &mut self.graph, &self.schemas);
        info!(
            connections = report.connections.len(),
            skipped = report.warnings.len(),
            "mapping loaded"
        );
        report
    }

    pub fn import_mapping_json(&mut self, json: &str) -> Result<ImportReport, DocumentError> {
        let mapping = MappingDocument::from_json(json)?;
        Ok(self.import_mapping(&mapping))
    }

    /// Replaces the business metadata of a destination field.
    pub fn update_field_metadata(
        &mut self,
        path: &str,
        metadata: BusinessMetadata,
    ) -> Result<(), SchemaError> {
        let path = self.destination_path(path)?;
        self.schemas.destination.set_metadata(&path, metadata)
    }

    /// Streams a generated business description into a destination field.
    pub fn describe_field(
        &mut self,
        path: &str,
        generator: &mut dyn TextGenerator,
        cancel: &CancellationFlag,
    ) -> Result<DescriptionOutcome, DescribeError> {
        let path = self.destination_path(path)?;
        let field = self.schemas.destination.field_mut(&path)?;
        let prompt = describe::description_prompt(&path, field);
        describe::describe_field(
            &mut self.schemas.destination,
            &path,
            &prompt,
            generator,
            cancel,
        )
    }

    fn destination_path(&self, path: &str) -> Result<FieldPath, SchemaError> {
        let parsed =
            FieldPath::parse(path).map_err(|_| SchemaError::FieldNotFound(path.to_string()))?;
        if parsed.root() != self.schemas.destination.name() {
            return Err(SchemaError::NotDestination(path.to_string()));
        }
        Ok(parsed)
    }
}
