//! Subcommand definitions and their execution against a [`GraphStore`].
//!
//! Every command yields a JSON document; `main` prints it.

use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde_json::{Value, json};
use trellis_core::{
  graph::EdgeVisibility,
  instance::{InstanceType, NewInstance},
  store::GraphStore,
};
use uuid::Uuid;

// ─── CLI surface ──────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create the store file and apply the schema.
  Init,

  /// Node operations.
  #[command(subcommand)]
  Node(NodeCommand),

  /// Edge operations.
  #[command(subcommand)]
  Edge(EdgeCommand),

  /// Node change-log operations.
  #[command(subcommand)]
  Instance(InstanceCommand),
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
  /// Create a node with an initial value.
  Add {
    /// JSON payload of the `created` instance.
    #[arg(long, default_value = "null")]
    value: String,
    /// Use this id instead of a generated one.
    #[arg(long)]
    id: Option<Uuid>,
  },
  /// Show one node.
  Show { id: Uuid },
  /// List nodes in creation order.
  List {
    /// Include soft-deleted nodes.
    #[arg(long)]
    all: bool,
  },
  /// Record a new value for a live node.
  Update {
    id: Uuid,
    /// JSON payload.
    #[arg(long)]
    value: String,
  },
  /// Soft-delete a node.
  Delete {
    id: Uuid,
    /// Also soft-delete every live edge touching the node.
    #[arg(long)]
    cascade: bool,
  },
  /// Bring a soft-deleted node back.
  Restore { id: Uuid },
  /// Print the node's current value.
  Value { id: Uuid },
}

/// Which edges an adjacency listing shows.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct EdgeFilter {
  /// Include soft-deleted edges.
  #[arg(long, conflicts_with = "live_endpoints")]
  pub all:            bool,
  /// Only edges whose source and target nodes are live.
  #[arg(long)]
  pub live_endpoints: bool,
}

impl EdgeFilter {
  fn visibility(self) -> EdgeVisibility {
    match (self.all, self.live_endpoints) {
      (true, _) => EdgeVisibility::All,
      (false, true) => EdgeVisibility::LiveEndpoints,
      (false, false) => EdgeVisibility::Live,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum EdgeCommand {
  /// Create a directed edge SOURCE -> TARGET.
  Add {
    source: Uuid,
    target: Uuid,
    /// Use this id instead of a generated one.
    #[arg(long)]
    id: Option<Uuid>,
  },
  /// Show one edge.
  Show { id: Uuid },
  /// Soft-delete an edge.
  Delete { id: Uuid },
  /// Bring a soft-deleted edge back.
  Restore { id: Uuid },
  /// Edges leaving NODE.
  From {
    node: Uuid,
    #[command(flatten)]
    filter: EdgeFilter,
  },
  /// Edges arriving at NODE.
  To {
    node: Uuid,
    #[command(flatten)]
    filter: EdgeFilter,
  },
}

#[derive(Subcommand, Debug)]
pub enum InstanceCommand {
  /// Append an instance to a node's history.
  Record {
    node: Uuid,
    /// created | updated | deleted | restored
    #[arg(long = "type")]
    instance_type: InstanceType,
    /// JSON payload.
    #[arg(long)]
    value: String,
    /// Use this id instead of a generated one.
    #[arg(long)]
    id: Option<Uuid>,
  },
  /// Print a node's history in order.
  History { node: Uuid },
}

// ─── Execution ────────────────────────────────────────────────────────────────

pub async fn execute<S>(store: &S, command: Command) -> anyhow::Result<Value>
where
  S: GraphStore,
{
  match command {
    Command::Init => Ok(json!({ "status": "ok" })),
    Command::Node(cmd) => node(store, cmd).await,
    Command::Edge(cmd) => edge(store, cmd).await,
    Command::Instance(cmd) => instance(store, cmd).await,
  }
}

fn parse_value(raw: &str) -> anyhow::Result<Value> {
  serde_json::from_str(raw).context("--value is not valid JSON")
}

async fn node<S: GraphStore>(store: &S, cmd: NodeCommand) -> anyhow::Result<Value> {
  let out = match cmd {
    NodeCommand::Add { value, id: Some(id) } => {
      json!(store.create_node_with_id(id, parse_value(&value)?).await?)
    }
    NodeCommand::Add { value, id: None } => json!(store.create_node(parse_value(&value)?).await?),
    NodeCommand::Show { id } => {
      let node = store
        .get_node(id)
        .await?
        .with_context(|| format!("node {id} not found"))?;
      json!(node)
    }
    NodeCommand::List { all } => json!(store.list_nodes(all).await?),
    NodeCommand::Update { id, value } => json!(store.update_node(id, parse_value(&value)?).await?),
    NodeCommand::Delete { id, cascade: false } => json!(store.soft_delete_node(id).await?),
    NodeCommand::Delete { id, cascade: true } => {
      let (node, edges) = store.soft_delete_node_cascade(id).await?;
      json!({ "node": node, "edges_deleted": edges })
    }
    NodeCommand::Restore { id } => json!(store.restore_node(id).await?),
    NodeCommand::Value { id } => json!(store.current_value(id).await?),
  };
  Ok(out)
}

async fn edge<S: GraphStore>(store: &S, cmd: EdgeCommand) -> anyhow::Result<Value> {
  let out = match cmd {
    EdgeCommand::Add { source, target, id: Some(id) } => {
      json!(store.create_edge_with_id(id, source, target).await?)
    }
    EdgeCommand::Add { source, target, id: None } => {
      json!(store.create_edge(source, target).await?)
    }
    EdgeCommand::Show { id } => {
      let edge = store
        .get_edge(id)
        .await?
        .with_context(|| format!("edge {id} not found"))?;
      json!(edge)
    }
    EdgeCommand::Delete { id } => json!(store.soft_delete_edge(id).await?),
    EdgeCommand::Restore { id } => json!(store.restore_edge(id).await?),
    EdgeCommand::From { node, filter } => {
      json!(store.edges_from(node, filter.visibility()).await?)
    }
    EdgeCommand::To { node, filter } => json!(store.edges_to(node, filter.visibility()).await?),
  };
  Ok(out)
}

async fn instance<S: GraphStore>(store: &S, cmd: InstanceCommand) -> anyhow::Result<Value> {
  let out = match cmd {
    InstanceCommand::Record { node, instance_type, value, id } => {
      let mut input = NewInstance::new(node, instance_type, parse_value(&value)?);
      if let Some(id) = id {
        input = input.with_id(id);
      }
      json!(store.record_instance(input).await?)
    }
    InstanceCommand::History { node } => json!(store.history(node).await?),
  };
  Ok(out)
}
