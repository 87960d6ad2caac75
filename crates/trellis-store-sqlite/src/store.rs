//! [`SqliteStore`] — the SQLite implementation of [`GraphStore`].

use std::{path::Path, time::Duration};

use rusqlite::{Connection, OptionalExtension as _, params};
use serde_json::Value;
use tracing::{debug, info, instrument};
use trellis_core::{
  graph::{Direction, Edge, EdgeVisibility, Node},
  instance::{InstanceType, NewInstance, NodeInstance},
  store::GraphStore,
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    EDGE_COLUMNS, EDGE_E_LIVE, ENDPOINTS_LIVE, INSTANCE_COLUMNS, NODE_N_LIVE, NODE_SELECT,
    RawEdge, RawInstance, RawNode, decode_value, encode_dt, encode_uuid, encode_value, now,
  },
  schema::SCHEMA,
};

/// How long a statement waits on a lock held by another connection to the
/// same file before failing with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Trellis graph store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// runs on the connection's own thread, so statements never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Outcome of a conditional edge stamp: rows updated, plus the row as it
/// stands afterwards (`None` if it does not exist).
type Stamped<R> = (usize, Option<R>);

/// One node lifecycle transition, applied by [`SqliteStore::transition`].
struct Transition {
  instance_id:   Uuid,
  node_id:       Uuid,
  instance_type: InstanceType,
  /// `None` carries the node's last value forward.
  value:         Option<Value>,
  /// Deletes only: stamp live incident edges as well.
  cascade:       bool,
  /// Leave a missing node to the foreign key instead of reporting
  /// `NodeNotFound`.
  raw_append:    bool,
}

/// Rows as they stand after a transition was applied.
struct Applied {
  node:     Node,
  instance: NodeInstance,
  edges:    usize,
}

/// Append an instance numbered after the node's newest one, within the
/// caller's transaction.
fn append_instance(
  conn: &Connection,
  instance_id: &str,
  node_id: &str,
  value: &str,
  instance_type: InstanceType,
  recorded_at: &str,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO node_instance
       (instance_id, node_id, seq, value, instance_type, recorded_at)
     SELECT ?1, ?2, COALESCE(MAX(seq), 0) + 1, ?3, ?4, ?5
     FROM node_instance WHERE node_id = ?2",
    params![instance_id, node_id, value, instance_type.tag(), recorded_at],
  )?;
  Ok(())
}

fn select_node(conn: &Connection, node_id: &str) -> rusqlite::Result<Option<RawNode>> {
  conn
    .query_row(
      &format!("{NODE_SELECT} WHERE n.node_id = ?1"),
      params![node_id],
      RawNode::from_row,
    )
    .optional()
}

fn select_edge(conn: &Connection, edge_id: &str) -> rusqlite::Result<Option<RawEdge>> {
  conn
    .query_row(
      &format!("SELECT {EDGE_COLUMNS} FROM edge e WHERE e.edge_id = ?1"),
      params![edge_id],
      RawEdge::from_row,
    )
    .optional()
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether the connection currently enforces foreign keys.
  pub async fn foreign_keys_enabled(&self) -> Result<bool> {
    let on: bool = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?))
      .await?;
    Ok(on)
  }

  /// How long the connection waits on a locked database.
  pub async fn busy_timeout(&self) -> Result<Duration> {
    let ms: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA busy_timeout", [], |r| r.get(0))?))
      .await?;
    Ok(Duration::from_millis(u64::try_from(ms).unwrap_or(0)))
  }

  /// Insert a node row together with its `created` instance.
  async fn insert_node(&self, node_id: Uuid, value: Value) -> Result<Node> {
    let created_at = now();
    let node = Node {
      node_id,
      created_at,
      deleted_at: None,
      last_transition: Some(InstanceType::Created),
    };

    let id_str       = encode_uuid(node_id);
    let instance_str = encode_uuid(Uuid::new_v4());
    let value_str    = encode_value(&value)?;
    let at_str       = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO node (node_id, created_at) VALUES (?1, ?2)",
          params![id_str, at_str],
        )?;
        append_instance(&tx, &instance_str, &id_str, &value_str, InstanceType::Created, &at_str)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(node_id = %node.node_id, "node created");
    Ok(node)
  }

  async fn insert_edge(&self, edge_id: Uuid, source: Uuid, target: Uuid) -> Result<Edge> {
    let edge = Edge {
      edge_id,
      source,
      target,
      created_at: now(),
      deleted_at: None,
      restored_at: None,
    };

    let id_str     = encode_uuid(edge.edge_id);
    let source_str = encode_uuid(source);
    let target_str = encode_uuid(target);
    let at_str     = encode_dt(edge.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO edge (edge_id, source, target, created_at) VALUES (?1, ?2, ?3, ?4)",
          params![id_str, source_str, target_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(edge_id = %edge.edge_id, %source, %target, "edge created");
    Ok(edge)
  }

  /// Apply one lifecycle transition in a single transaction: check it
  /// against the node's current state, stamp `deleted_at` for deletes, and
  /// append the instance.
  ///
  /// The next sequence number is derived and written in one statement, and
  /// calls on the connection are serialised, so two appends can never
  /// observe the same MAX(seq).
  async fn transition(&self, t: Transition) -> Result<Applied> {
    let at_str          = encode_dt(now());
    let node_id_str     = encode_uuid(t.node_id);
    let instance_id_str = encode_uuid(t.instance_id);
    let value_str       = t.value.as_ref().map(encode_value).transpose()?;
    let Transition { node_id, instance_type, cascade, raw_append, .. } = t;

    let applied = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        match select_node(&tx, &node_id_str)? {
          Some(before) => {
            if let Err(refused) = instance_type.check_transition(node_id, before.is_live()) {
              return Ok(Err(refused));
            }
          }
          None if !raw_append => return Ok(Err(trellis_core::Error::NodeNotFound(node_id))),
          None => {}
        }

        let value_str = match value_str {
          Some(v) => v,
          None => tx
            .query_row(
              "SELECT value FROM node_instance WHERE node_id = ?1 ORDER BY seq DESC LIMIT 1",
              params![node_id_str],
              |r| r.get(0),
            )
            .optional()?
            .unwrap_or_else(|| "null".to_owned()),
        };

        let mut edges = 0;
        if instance_type == InstanceType::Deleted {
          tx.execute(
            "UPDATE node SET deleted_at = COALESCE(deleted_at, ?1) WHERE node_id = ?2",
            params![at_str, node_id_str],
          )?;
          if cascade {
            edges = tx.execute(
              &format!(
                "UPDATE edge AS e SET deleted_at = COALESCE(deleted_at, ?1), restored_at = NULL
                 WHERE (source = ?2 OR target = ?2) AND {EDGE_E_LIVE}"
              ),
              params![at_str, node_id_str],
            )?;
          }
        }

        append_instance(&tx, &instance_id_str, &node_id_str, &value_str, instance_type, &at_str)?;

        let node = tx.query_row(
          &format!("{NODE_SELECT} WHERE n.node_id = ?1"),
          params![node_id_str],
          RawNode::from_row,
        )?;
        let instance = tx.query_row(
          &format!("SELECT {INSTANCE_COLUMNS} FROM node_instance WHERE instance_id = ?1"),
          params![instance_id_str],
          RawInstance::from_row,
        )?;

        tx.commit()?;
        Ok(Ok((node, instance, edges)))
      })
      .await??;

    let (node, instance, edges) = applied;
    Ok(Applied { node: node.into_node()?, instance: instance.into_instance()?, edges })
  }

  /// Run a conditional `UPDATE` on one edge (`?1` = now, `?2` = edge id) and
  /// read the row back, in one transaction.
  async fn stamp_edge(&self, id: Uuid, sql: &'static str) -> Result<Stamped<Edge>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let (updated, raw): Stamped<RawEdge> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = tx.execute(sql, params![at_str, id_str])?;
        let raw = select_edge(&tx, &id_str)?;
        tx.commit()?;
        Ok((updated, raw))
      })
      .await?;

    Ok((updated, raw.map(RawEdge::into_edge).transpose()?))
  }

  /// Adjacency lookup on one side of the edge table. Each side is served by
  /// its own index (`edge_source` / `edge_target`).
  async fn adjacent(
    &self,
    node: Uuid,
    direction: Direction,
    visibility: EdgeVisibility,
  ) -> Result<Vec<Edge>> {
    let column = match direction {
      Direction::Outgoing => "source",
      Direction::Incoming => "target",
    };
    let filter = match visibility {
      EdgeVisibility::All => "1".to_owned(),
      EdgeVisibility::Live => EDGE_E_LIVE.to_owned(),
      EdgeVisibility::LiveEndpoints => format!("{EDGE_E_LIVE} AND {ENDPOINTS_LIVE}"),
    };
    let sql = format!(
      "SELECT {EDGE_COLUMNS} FROM edge e
       JOIN node s ON s.node_id = e.source
       JOIN node t ON t.node_id = e.target
       WHERE e.{column} = ?1 AND {filter}
       ORDER BY e.created_at, e.rowid"
    );
    let node_str = encode_uuid(node);

    let raws: Vec<RawEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params![node_str], RawEdge::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEdge::into_edge).collect()
  }

  fn lifecycle(node_id: Uuid, instance_type: InstanceType, value: Option<Value>) -> Transition {
    Transition {
      instance_id: Uuid::new_v4(),
      node_id,
      instance_type,
      value,
      cascade: false,
      raw_append: false,
    }
  }
}

// ─── GraphStore impl ─────────────────────────────────────────────────────────

impl GraphStore for SqliteStore {
  type Error = crate::Error;

  // ── Nodes ─────────────────────────────────────────────────────────────────

  #[instrument(skip(self, value))]
  async fn create_node(&self, value: Value) -> Result<Node> {
    self.insert_node(Uuid::new_v4(), value).await
  }

  #[instrument(skip(self, value))]
  async fn create_node_with_id(&self, id: Uuid, value: Value) -> Result<Node> {
    self.insert_node(id, value).await
  }

  async fn get_node(&self, id: Uuid) -> Result<Option<Node>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawNode> = self
      .conn
      .call(move |conn| Ok(select_node(conn, &id_str)?))
      .await?;

    raw.map(RawNode::into_node).transpose()
  }

  async fn list_nodes(&self, include_deleted: bool) -> Result<Vec<Node>> {
    let raws: Vec<RawNode> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{NODE_SELECT}
           WHERE ?1 OR {NODE_N_LIVE}
           ORDER BY n.created_at, n.rowid"
        ))?;
        let rows = stmt
          .query_map(params![include_deleted], RawNode::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNode::into_node).collect()
  }

  #[instrument(skip(self, value))]
  async fn update_node(&self, id: Uuid, value: Value) -> Result<NodeInstance> {
    let applied = self
      .transition(Self::lifecycle(id, InstanceType::Updated, Some(value)))
      .await?;
    debug!(node_id = %id, seq = applied.instance.seq, "node updated");
    Ok(applied.instance)
  }

  #[instrument(skip(self))]
  async fn soft_delete_node(&self, id: Uuid) -> Result<Node> {
    let applied = self.transition(Self::lifecycle(id, InstanceType::Deleted, None)).await?;
    info!(node_id = %id, "soft-deleted node");
    Ok(applied.node)
  }

  #[instrument(skip(self))]
  async fn soft_delete_node_cascade(&self, id: Uuid) -> Result<(Node, usize)> {
    let mut t = Self::lifecycle(id, InstanceType::Deleted, None);
    t.cascade = true;
    let applied = self.transition(t).await?;
    info!(node_id = %id, edges = applied.edges, "soft-deleted node");
    Ok((applied.node, applied.edges))
  }

  #[instrument(skip(self))]
  async fn restore_node(&self, id: Uuid) -> Result<Node> {
    let applied = self.transition(Self::lifecycle(id, InstanceType::Restored, None)).await?;
    info!(node_id = %id, "restored node");
    Ok(applied.node)
  }

  async fn current_value(&self, id: Uuid) -> Result<Option<Value>> {
    let id_str = encode_uuid(id);

    // Outer `None`: no such node. Inner `None`: no history yet.
    let raw: Option<Option<String>> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT (SELECT value FROM node_instance
                     WHERE node_id = ?1 ORDER BY seq DESC LIMIT 1)
             FROM node WHERE node_id = ?1",
            params![id_str],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    let Some(latest) = raw else {
      return Err(trellis_core::Error::NodeNotFound(id).into());
    };
    latest.as_deref().map(decode_value).transpose()
  }

  // ── Edges ─────────────────────────────────────────────────────────────────

  #[instrument(skip(self))]
  async fn create_edge(&self, source: Uuid, target: Uuid) -> Result<Edge> {
    self.insert_edge(Uuid::new_v4(), source, target).await
  }

  #[instrument(skip(self))]
  async fn create_edge_with_id(&self, id: Uuid, source: Uuid, target: Uuid) -> Result<Edge> {
    self.insert_edge(id, source, target).await
  }

  async fn get_edge(&self, id: Uuid) -> Result<Option<Edge>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEdge> = self
      .conn
      .call(move |conn| Ok(select_edge(conn, &id_str)?))
      .await?;

    raw.map(RawEdge::into_edge).transpose()
  }

  #[instrument(skip(self))]
  async fn soft_delete_edge(&self, id: Uuid) -> Result<Edge> {
    let (updated, edge) = self
      .stamp_edge(
        id,
        "UPDATE edge SET deleted_at = COALESCE(deleted_at, ?1), restored_at = NULL
         WHERE edge_id = ?2 AND (deleted_at IS NULL OR restored_at IS NOT NULL)",
      )
      .await?;

    let Some(edge) = edge else {
      return Err(trellis_core::Error::EdgeNotFound(id).into());
    };
    if updated == 0 {
      return Err(trellis_core::Error::EdgeAlreadyDeleted(id).into());
    }

    info!(edge_id = %id, "soft-deleted edge");
    Ok(edge)
  }

  #[instrument(skip(self))]
  async fn restore_edge(&self, id: Uuid) -> Result<Edge> {
    let (updated, edge) = self
      .stamp_edge(
        id,
        "UPDATE edge SET restored_at = ?1
         WHERE edge_id = ?2 AND deleted_at IS NOT NULL AND restored_at IS NULL",
      )
      .await?;

    let Some(edge) = edge else {
      return Err(trellis_core::Error::EdgeNotFound(id).into());
    };
    if updated == 0 {
      return Err(trellis_core::Error::EdgeNotDeleted(id).into());
    }

    info!(edge_id = %id, "restored edge");
    Ok(edge)
  }

  async fn edges_from(&self, node: Uuid, visibility: EdgeVisibility) -> Result<Vec<Edge>> {
    self.adjacent(node, Direction::Outgoing, visibility).await
  }

  async fn edges_to(&self, node: Uuid, visibility: EdgeVisibility) -> Result<Vec<Edge>> {
    self.adjacent(node, Direction::Incoming, visibility).await
  }

  // ── Instance log — append-only ────────────────────────────────────────────

  #[instrument(skip(self, input), fields(node_id = %input.node_id, instance_type = %input.instance_type))]
  async fn record_instance(&self, input: NewInstance) -> Result<NodeInstance> {
    let applied = self
      .transition(Transition {
        instance_id:   input.instance_id.unwrap_or_else(Uuid::new_v4),
        node_id:       input.node_id,
        instance_type: input.instance_type,
        value:         Some(input.value),
        cascade:       false,
        raw_append:    true,
      })
      .await?;

    debug!(instance_id = %applied.instance.instance_id, seq = applied.instance.seq, "instance recorded");
    Ok(applied.instance)
  }

  async fn history(&self, node_id: Uuid) -> Result<Vec<NodeInstance>> {
    let node_id_str = encode_uuid(node_id);

    let raws: Vec<RawInstance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INSTANCE_COLUMNS} FROM node_instance
           WHERE node_id = ?1
           ORDER BY seq"
        ))?;
        let rows = stmt
          .query_map(params![node_id_str], RawInstance::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInstance::into_instance).collect()
  }
}
