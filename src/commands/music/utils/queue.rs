//! Per-guild track queue: an ordered track list with a playback cursor and a
//! repeat-mode policy. Pure data structure; the player drives all mutation.

use rand::seq::SliceRandom;

use super::music_manager::MusicError;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;

/// Policy applied when the cursor crosses a queue boundary or a track ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// No automatic continuation past the final track.
    #[default]
    Stop,
    /// Replay the current track on every track end.
    Song,
    /// Wrap back to the first track after the final one.
    Queue,
}

/// The playback queue for a single guild.
///
/// `position` is a cursor into `tracks`. Tracks before the cursor are
/// history and are never reordered; tracks after it are upcoming and may be
/// shuffled. The cursor can leave `0..len` transiently (skip-back and
/// skip-to park it below zero or past the end and rely on the next
/// `get_next_track` call to land it), so it is signed.
#[derive(Debug, Default)]
pub struct Queue {
    tracks: Vec<TrackMetadata>,
    position: isize,
    repeat_mode: RepeatMode,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: isize) {
        self.position = position;
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// Append tracks in the given order. No dedup and no size cap.
    pub fn add<I>(&mut self, tracks: I)
    where
        I: IntoIterator<Item = TrackMetadata>,
    {
        self.tracks.extend(tracks);
    }

    /// The track under the cursor.
    ///
    /// Fails with `QueueEmpty` when no tracks exist at all; returns `None`
    /// when tracks exist but the cursor is out of range (queue finished).
    pub fn current_track(&self) -> Result<Option<&TrackMetadata>, MusicError> {
        if self.tracks.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        Ok(usize::try_from(self.position)
            .ok()
            .and_then(|index| self.tracks.get(index)))
    }

    /// Tracks after the cursor, in play order.
    pub fn upcoming(&self) -> Result<&[TrackMetadata], MusicError> {
        if self.tracks.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        let start = (self.position + 1).clamp(0, self.tracks.len() as isize) as usize;
        Ok(&self.tracks[start..])
    }

    /// Tracks before the cursor, oldest first.
    pub fn history(&self) -> Result<&[TrackMetadata], MusicError> {
        if self.tracks.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        let end = self.position.clamp(0, self.tracks.len() as isize) as usize;
        Ok(&self.tracks[..end])
    }

    /// Advance the cursor and return the track that should play next.
    ///
    /// This is the only transition that decides what plays next. Returns
    /// `None` when the cursor lands below zero or runs off the end of a
    /// non-wrapping queue; with `RepeatMode::Queue` the cursor wraps to the
    /// first track instead. Once past the end the cursor stays there, so
    /// repeated calls keep returning `None` without error.
    pub fn get_next_track(&mut self) -> Result<Option<&TrackMetadata>, MusicError> {
        if self.tracks.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        self.position += 1;

        if self.position < 0 {
            return Ok(None);
        }

        if self.position as usize >= self.tracks.len() {
            if self.repeat_mode == RepeatMode::Queue {
                self.position = 0;
            } else {
                return Ok(None);
            }
        }

        Ok(Some(&self.tracks[self.position as usize]))
    }

    /// Shuffle the unplayed suffix in place.
    ///
    /// History and the current track are left untouched; only the tracks
    /// after the cursor are reordered.
    pub fn shuffle(&mut self) -> Result<(), MusicError> {
        if self.tracks.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        let start = (self.position + 1).clamp(0, self.tracks.len() as isize) as usize;
        self.tracks[start..].shuffle(&mut rand::rng());
        Ok(())
    }

    /// Set the repeat mode from its user-facing name.
    ///
    /// Unknown names are ignored; validating user input is the caller's job.
    pub fn set_repeat_mode(&mut self, mode: &str) {
        match mode {
            "stop" => self.repeat_mode = RepeatMode::Stop,
            "song" => self.repeat_mode = RepeatMode::Song,
            "queue" => self.repeat_mode = RepeatMode::Queue,
            _ => {}
        }
    }

    /// Reset the playback cursor to the first track.
    ///
    /// The track list itself is kept; this rewinds playback, it does not
    /// clear contents.
    pub fn empty(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn track(title: &str) -> TrackMetadata {
        TrackMetadata {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn queue_of(titles: &[&str]) -> Queue {
        let mut queue = Queue::new();
        queue.add(titles.iter().map(|t| track(t)));
        queue
    }

    fn titles(tracks: &[TrackMetadata]) -> Vec<String> {
        tracks.iter().map(|t| t.title.clone()).collect()
    }

    /// Adding tracks to an empty queue leaves the cursor on the first one.
    #[test]
    fn test_add_from_empty_sets_first_as_current() {
        let queue = queue_of(&["a", "b", "c"]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_track().unwrap().unwrap().title, "a");
    }

    /// Every accessor reports an empty queue as a distinct condition, and a
    /// later `add` unblocks all of them.
    #[test]
    fn test_empty_queue_is_explicitly_signaled() {
        let mut queue = Queue::new();

        assert_matches!(queue.current_track(), Err(MusicError::QueueEmpty));
        assert_matches!(queue.upcoming(), Err(MusicError::QueueEmpty));
        assert_matches!(queue.history(), Err(MusicError::QueueEmpty));
        assert_matches!(queue.get_next_track(), Err(MusicError::QueueEmpty));
        assert_matches!(queue.shuffle(), Err(MusicError::QueueEmpty));

        // get_next_track above must not have moved the cursor.
        assert_eq!(queue.position(), 0);

        queue.add([track("a")]);
        assert_eq!(queue.current_track().unwrap().unwrap().title, "a");
        assert!(queue.upcoming().unwrap().is_empty());
        assert!(queue.history().unwrap().is_empty());
        assert!(queue.shuffle().is_ok());
    }

    /// Walking a non-repeating queue visits every track once, then keeps
    /// reporting "no track" without erroring.
    #[test]
    fn test_get_next_track_walks_then_stops() {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert_eq!(queue.get_next_track().unwrap().unwrap().title, "b");
        assert_eq!(queue.get_next_track().unwrap().unwrap().title, "c");
        assert_eq!(queue.get_next_track().unwrap(), None);
        assert_eq!(queue.get_next_track().unwrap(), None);

        // The cursor rests past the end, so there is no current track even
        // though the queue still holds tracks.
        assert_eq!(queue.current_track().unwrap(), None);
    }

    /// With queue repeat, advancing past the last track wraps to the first.
    #[test]
    fn test_get_next_track_wraps_with_queue_repeat() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_repeat_mode("queue");

        for expected in ["b", "c", "a", "b"] {
            assert_eq!(queue.get_next_track().unwrap().unwrap().title, expected);
        }
        assert_eq!(queue.position(), 1);
    }

    /// A cursor parked below zero yields "no track" without advancing
    /// further into the list.
    #[test]
    fn test_get_next_track_negative_cursor() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_position(-2);

        assert_eq!(queue.get_next_track().unwrap(), None);
        assert_eq!(queue.position(), -1);
        assert_eq!(queue.get_next_track().unwrap().unwrap().title, "a");
    }

    /// Shuffle reorders only the unplayed suffix: history and the current
    /// track stay put and the suffix keeps the same multiset of tracks.
    #[test]
    fn test_shuffle_preserves_history_and_current() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e", "f"]);
        queue.set_position(2);

        queue.shuffle().unwrap();

        assert_eq!(titles(queue.history().unwrap()), vec!["a", "b"]);
        assert_eq!(queue.current_track().unwrap().unwrap().title, "c");

        let suffix: HashSet<String> = titles(queue.upcoming().unwrap()).into_iter().collect();
        let expected: HashSet<String> =
            ["d", "e", "f"].iter().map(|s| s.to_string()).collect();
        assert_eq!(suffix, expected);
    }

    /// `empty` rewinds the cursor but keeps the track list.
    #[test]
    fn test_empty_resets_cursor_only() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.get_next_track().unwrap();
        assert_eq!(queue.position(), 1);

        queue.empty();

        assert_eq!(queue.position(), 0);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_track().unwrap().unwrap().title, "a");
    }

    /// Unknown repeat-mode names are ignored at this layer.
    #[test]
    fn test_set_repeat_mode_ignores_unknown_names() {
        let mut queue = queue_of(&["a"]);

        queue.set_repeat_mode("song");
        assert_eq!(queue.repeat_mode(), RepeatMode::Song);

        queue.set_repeat_mode("sing");
        assert_eq!(queue.repeat_mode(), RepeatMode::Song);

        queue.set_repeat_mode("stop");
        assert_eq!(queue.repeat_mode(), RepeatMode::Stop);
    }

    /// Upcoming and history are the slices around the cursor.
    #[test]
    fn test_upcoming_and_history_split_around_cursor() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        queue.get_next_track().unwrap();
        queue.get_next_track().unwrap();

        assert_eq!(titles(queue.history().unwrap()), vec!["a", "b"]);
        assert_eq!(queue.current_track().unwrap().unwrap().title, "c");
        assert_eq!(titles(queue.upcoming().unwrap()), vec!["d"]);
    }
}
