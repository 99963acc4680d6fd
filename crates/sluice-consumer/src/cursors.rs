use sluice_client::{Error, PartitionApi, Result};
use sluice_types::{
    Cursor, CursorDistance, CursorDistanceQuery, EventTypeName, Partition, ShiftedCursor,
};
use std::sync::Arc;

/// Cursor arithmetic over opaque offsets.
///
/// Nothing here inspects an offset token; shifting and measuring are
/// resolved by the server through [`PartitionApi`].
pub struct CursorCalculator {
    api: Arc<dyn PartitionApi>,
}

impl CursorCalculator {
    pub fn new(api: Arc<dyn PartitionApi>) -> Self {
        Self { api }
    }

    /// Cursor at the newest event of every partition
    pub async fn current_cursors(&self, event_type: &EventTypeName) -> Result<Vec<Cursor>> {
        let partitions = self.api.partitions(event_type).await?;
        Ok(partitions.iter().map(Partition::newest_cursor).collect())
    }

    /// Move every cursor `n` events forward on its partition.
    ///
    /// `n == 0` returns the input unchanged without calling the server.
    /// Fails with [`Error::InsufficientRange`] when a partition does not hold
    /// `n` more events past the cursor.
    pub async fn shift(
        &self,
        event_type: &EventTypeName,
        cursors: &[Cursor],
        n: u64,
    ) -> Result<Vec<Cursor>> {
        for cursor in cursors {
            check_event_type(event_type, cursor)?;
        }
        if n == 0 || cursors.is_empty() {
            return Ok(cursors.to_vec());
        }

        let requested = i64::try_from(n)
            .map_err(|_| Error::CursorDistanceNoResult(format!("shift of {} is out of range", n)))?;

        let partitions = self.api.partitions(event_type).await?;
        let mut room_queries = Vec::with_capacity(cursors.len());
        for cursor in cursors {
            let partition = partitions
                .iter()
                .find(|p| p.partition == cursor.partition)
                .ok_or_else(|| Error::UnknownPartition {
                    event_type: event_type.clone(),
                    partition: cursor.partition.clone(),
                })?;
            room_queries.push(CursorDistanceQuery::new(cursor, &partition.newest_cursor()));
        }

        let room = self.api.cursor_distances(event_type, room_queries).await?;
        if room.len() != cursors.len() {
            return Err(Error::CursorDistanceNoResult(format!(
                "expected {} distances, got {}",
                cursors.len(),
                room.len()
            )));
        }
        for (cursor, available) in cursors.iter().zip(&room) {
            if available.distance < requested {
                return Err(Error::InsufficientRange {
                    partition: cursor.partition.clone(),
                    requested: n,
                    available: available.distance,
                });
            }
        }

        let shifts = cursors
            .iter()
            .map(|cursor| ShiftedCursor::new(cursor, requested))
            .collect();
        let shifted = self.api.shift_cursors(event_type, shifts).await?;
        if shifted.len() != cursors.len() {
            return Err(Error::CursorDistanceNoResult(format!(
                "expected {} shifted cursors, got {}",
                cursors.len(),
                shifted.len()
            )));
        }

        tracing::debug!(event_type = %event_type, n, count = cursors.len(), "Shifted cursors");

        cursors
            .iter()
            .zip(shifted)
            .map(|(original, moved)| {
                if moved.partition != original.partition {
                    return Err(Error::CursorDistanceNoResult(format!(
                        "shift of partition {} answered for partition {}",
                        original.partition, moved.partition
                    )));
                }
                Ok(Cursor {
                    partition: moved.partition,
                    offset: moved.offset,
                    event_type: original.event_type.clone(),
                    cursor_token: None,
                })
            })
            .collect()
    }

    /// Signed number of events from `a` to `b`; negative when `b` is behind
    pub async fn distance(
        &self,
        event_type: &EventTypeName,
        a: &Cursor,
        b: &Cursor,
    ) -> Result<CursorDistance> {
        let mut distances = self
            .distances(event_type, &[(a.clone(), b.clone())])
            .await?;
        distances
            .pop()
            .ok_or_else(|| Error::CursorDistanceNoResult("empty distance response".to_string()))
    }

    /// Pairwise distances, in the order of `pairs`
    pub async fn distances(
        &self,
        event_type: &EventTypeName,
        pairs: &[(Cursor, Cursor)],
    ) -> Result<Vec<CursorDistance>> {
        let mut queries = Vec::with_capacity(pairs.len());
        for (a, b) in pairs {
            check_event_type(event_type, a)?;
            check_event_type(event_type, b)?;
            if !a.same_partition(b) {
                return Err(Error::CursorDistanceNoResult(format!(
                    "cursors belong to different partitions ({} and {})",
                    a.partition, b.partition
                )));
            }
            queries.push(CursorDistanceQuery::new(a, b));
        }
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.api.cursor_distances(event_type, queries).await?;
        if results.len() != pairs.len() {
            return Err(Error::CursorDistanceNoResult(format!(
                "expected {} distances, got {}",
                pairs.len(),
                results.len()
            )));
        }
        Ok(results.into_iter().map(|r| r.distance).collect())
    }
}

fn check_event_type(event_type: &EventTypeName, cursor: &Cursor) -> Result<()> {
    match &cursor.event_type {
        Some(name) if name != event_type.as_str() => Err(Error::CursorDistanceNoResult(format!(
            "cursor of event type {} used with {}",
            name, event_type
        ))),
        _ => Ok(()),
    }
}
