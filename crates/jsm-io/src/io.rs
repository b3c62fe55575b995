//! # Io
//!
//! Resolves logical actions to links and performs them through an
//! [`Agent`], rebuilding nodes from what comes back.

use serde_json::Value;

use jsm_model::{Builder, Event, Node};
use jsm_schema::Schema;

use crate::agent::Agent;
use crate::error::IoError;
use crate::link::{Link, Links};
use crate::rels::{Action, RelPolicy};

#[derive(Debug, Clone)]
pub struct Io<A> {
    agent: A,
    builder: Builder,
    links: Links,
    rels: RelPolicy,
}

impl<A: Agent> Io<A> {
    /// An `Io` with no configured links, the default rel table and a
    /// default [`Builder`].
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            builder: Builder::default(),
            links: Links::default(),
            rels: RelPolicy::default(),
        }
    }

    /// Build nodes returned by `read` with `builder` (and its registry and
    /// class channels).
    pub fn with_builder(mut self, builder: Builder) -> Self {
        self.builder = builder;
        self
    }

    /// Links consulted after a node's own schema links.
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    pub fn with_rels(mut self, rels: RelPolicy) -> Self {
        self.rels = rels;
        self
    }

    pub fn rels_mut(&mut self) -> &mut RelPolicy {
        &mut self.rels
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// The link `action` would follow for `node`.
    ///
    /// The node's schema links win over the configured ones.
    pub fn resolve(&self, action: Action, node: Option<&Node>) -> Result<Link, IoError> {
        self.find(action.name(), &self.rels.rels(action), node)
    }

    fn find(&self, action: &str, rels: &[String], node: Option<&Node>) -> Result<Link, IoError> {
        let schema_links = node.and_then(|n| schema_links(n.schema()));
        schema_links
            .as_ref()
            .and_then(|links| links.first_of(rels))
            .or_else(|| self.links.first_of(rels))
            .cloned()
            .ok_or_else(|| IoError::NoLink {
                action: action.to_string(),
                rels: rels.to_vec(),
            })
    }

    /// Fetch a collection of resources.
    ///
    /// `rels` overrides the `read` rels. The response is built under the
    /// link's `targetSchema`, or `fallback` when it has none.
    pub async fn read(&self, rels: Option<&[&str]>, fallback: &Schema) -> Result<Node, IoError> {
        let rels = match rels {
            Some(rels) => rels.iter().map(|r| r.to_string()).collect(),
            None => self.rels.rels(Action::Read),
        };
        let link = self.find(Action::Read.name(), &rels, None)?;
        self.fetch(&link, fallback).await
    }

    /// Fetch the template a new resource starts from.
    pub async fn read_default(&self, fallback: &Schema) -> Result<Node, IoError> {
        let link = self.resolve(Action::ReadDefault, None)?;
        self.fetch(&link, fallback).await
    }

    async fn fetch(&self, link: &Link, fallback: &Schema) -> Result<Node, IoError> {
        let href = link.href_for(&Value::Null);
        tracing::info!(rel = %link.rel, %href, "reading");
        let value = self.agent.follow(link, &href, None).await?;
        let schema = link
            .target_schema
            .clone()
            .map(Schema::new)
            .unwrap_or_else(|| fallback.clone());
        Ok(self.builder.build_node(&schema, value))
    }

    /// Re-fetch `node` and rebuild it in place.
    pub async fn refresh(&self, node: &mut Node) -> Result<(), IoError> {
        let link = self.resolve(Action::Refresh, Some(&*node))?;
        let href = link.href_for(&node.to_value());
        emit(node, Action::Refresh, Phase::Before);

        tracing::info!(rel = %link.rel, %href, "refreshing");
        let value = self.agent.follow(&link, &href, None).await?;
        let schema = link
            .target_schema
            .clone()
            .map(Schema::new)
            .unwrap_or_else(|| node.schema().clone());
        node.rebuild_from(schema, value);

        emit(node, Action::Refresh, Phase::After);
        Ok(())
    }

    /// Send `body` along the first configured link among `rels` and return
    /// the response.
    pub async fn write(&self, rels: &[&str], body: &Value) -> Result<Value, IoError> {
        let rels: Vec<String> = rels.iter().map(|r| r.to_string()).collect();
        let link = self.find("write", &rels, None)?;
        let href = link.href_for(body);
        tracing::info!(rel = %link.rel, %href, "writing");
        self.agent.follow(&link, &href, Some(body)).await
    }

    pub async fn create(&self, node: &mut Node) -> Result<(), IoError> {
        self.persist(Action::Create, node).await
    }

    pub async fn update(&self, node: &mut Node) -> Result<(), IoError> {
        self.persist(Action::Update, node).await
    }

    /// Update when an update link exists, create otherwise.
    pub async fn save(&self, node: &mut Node) -> Result<(), IoError> {
        self.persist(Action::Save, node).await
    }

    async fn persist(&self, action: Action, node: &mut Node) -> Result<(), IoError> {
        let link = self.resolve(action, Some(&*node))?;
        let body = node.to_value();
        let href = link.href_for(&body);
        emit(node, action, Phase::Before);

        tracing::info!(%action, rel = %link.rel, %href, "sending node");
        let response = self.agent.follow(&link, &href, Some(&body)).await?;
        if !response.is_null() {
            let schema = node.schema().clone();
            node.rebuild_from(schema, response);
        }

        emit(node, action, Phase::After);
        Ok(())
    }

    pub async fn delete(&self, node: &Node) -> Result<(), IoError> {
        let link = self.resolve(Action::Delete, Some(node))?;
        let href = link.href_for(&node.to_value());
        emit(node, Action::Delete, Phase::Before);

        tracing::info!(rel = %link.rel, %href, "deleting");
        self.agent.delete(&link, &href).await?;

        emit(node, Action::Delete, Phase::After);
        Ok(())
    }
}

fn schema_links(schema: &Schema) -> Option<Links> {
    let raw = schema.links()?;
    match Links::parse(raw) {
        Ok(links) => Some(links),
        Err(e) => {
            tracing::warn!(pointer = ?schema.pointer(), "ignoring schema links: {e}");
            None
        }
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Before,
    After,
}

fn emit(node: &Node, action: Action, phase: Phase) {
    if let Some((before, after)) = action.lifecycle() {
        let name = match phase {
            Phase::Before => before,
            Phase::After => after,
        };
        node.emit(name, &Event::Lifecycle { node });
    }
}
