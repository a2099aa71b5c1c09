//! The mapping graph: connections between endpoints plus the transform nodes
//! they may pass through.

mod endpoint;
mod transform;

pub use endpoint::*;
pub use transform::*;

use crate::error::GraphError;
use tracing::debug;

/// A directed edge between two endpoints. Connections are never edited in
/// place; remove and re-add to change an end.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn involves(&self, endpoint: &Endpoint) -> bool {
        &self.from == endpoint || &self.to == endpoint
    }

    /// True when either end is a port of transform `id`.
    pub fn touches_transform(&self, id: TransformId) -> bool {
        self.from.transform_id() == Some(id) || self.to.transform_id() == Some(id)
    }
}

/// All connections and transform nodes of one editing session.
#[derive(Debug, Clone, Default)]
pub struct MappingGraph {
    connections: Vec<Connection>,
    transforms: Vec<TransformNode>,
    next_connection_id: ConnectionId,
    next_transform_id: TransformId,
}

impl MappingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects `from` to `to`.
    ///
    /// Returns the id of the existing connection when the same pair is already
    /// connected in either direction. Self connections and references to missing transforms are
    /// rejected without touching the graph.
    pub fn add_connection(&mut self, from: Endpoint, to: Endpoint) -> Result<ConnectionId, GraphError> {
        if from == to {
            return Err(GraphError::SelfConnection(from));
        }
        for endpoint in [&from, &to] {
            if let Some(id) = endpoint.transform_id() {
                if self.transform(id).is_none() {
                    return Err(GraphError::UnknownTransform(id));
                }
            }
        }
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| (c.from == from && c.to == to) || (c.from == to && c.to == from))
        {
            debug!(id = existing.id, "connection already exists, reusing");
            return Ok(existing.id);
        }

        let id = self.next_connection_id;
        self.next_connection_id += 1;
        debug!(id, %from, %to, "connection added");
        self.connections.push(Connection { id, from, to });
        Ok(id)
    }

    /// Removes a connection by id. Returns whether anything was removed.
    pub fn remove_connection(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        let removed = self.connections.len() != before;
        if removed {
            debug!(id, "connection removed");
        }
        removed
    }

    /// Adds a transform node.
    ///
    /// An explicit `id` is honoured (used when re-importing a saved mapping)
    /// and advances the id counter past it. Ids whose successor does not fit
    /// in a `TransformId` are rejected.
    pub fn add_transform(
        &mut self,
        kind: TransformKind,
        position: Option<Position>,
        id: Option<TransformId>,
    ) -> Result<TransformId, GraphError> {
        let id = match id {
            Some(id) => {
                if self.transform(id).is_some() {
                    return Err(GraphError::DuplicateTransform(id));
                }
                if id >= self.next_transform_id {
                    self.next_transform_id = id
                        .checked_add(1)
                        .ok_or(GraphError::TransformIdExhausted(id))?;
                }
                id
            }
            None => {
                let mut id = self.next_transform_id;
                while self.transform(id).is_some() {
                    id = id
                        .checked_add(1)
                        .ok_or(GraphError::TransformIdExhausted(id))?;
                }
                self.next_transform_id = id
                    .checked_add(1)
                    .ok_or(GraphError::TransformIdExhausted(id))?;
                id
            }
        };
        debug!(id, %kind, "transform added");
        self.transforms.push(TransformNode { id, kind, position });
        Ok(id)
    }

    /// Removes a transform and every connection attached to either of its
    /// ports. Returns the ids of the removed connections.
    pub fn remove_transform(&mut self, id: TransformId) -> Vec<ConnectionId> {
        let before = self.transforms.len();
        self.transforms.retain(|t| t.id != id);
        if self.transforms.len() == before {
            return Vec::new();
        }

        let removed: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|c| c.touches_transform(id))
            .map(|c| c.id)
            .collect();
        self.connections.retain(|c| !c.touches_transform(id));
        debug!(id, cascaded = removed.len(), "transform removed");
        removed
    }

    /// Moves a transform on the canvas. Returns false for unknown ids.
    pub fn move_transform(&mut self, id: TransformId, position: Position) -> bool {
        match self.transforms.iter_mut().find(|t| t.id == id) {
            Some(node) => {
                node.position = Some(position);
                true
            }
            None => false,
        }
    }

    pub fn connections_involving<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.involves(endpoint))
    }

    pub fn connections_for_transform(
        &self,
        id: TransformId,
    ) -> impl Iterator<Item = &Connection> + '_ {
        self.connections
            .iter()
            .filter(move |c| c.touches_transform(id))
    }

    /// Empties the graph. Id counters keep running so ids stay unique for the
    /// lifetime of the session.
    pub fn clear(&mut self) {
        debug!(
            connections = self.connections.len(),
            transforms = self.transforms.len(),
            "mapping graph cleared"
        );
        self.connections.clear();
        self.transforms.clear();
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn transform(&self, id: TransformId) -> Option<&TransformNode> {
        self.transforms.iter().find(|t| t.id == id)
    }

    /// Connections in creation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Transforms in insertion order.
    pub fn transforms(&self) -> &[TransformNode] {
        &self.transforms
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty() && self.transforms.is_empty()
    }
}
