use crate::media::{LocalTrack, TrackKind};

#[derive(Debug, Clone)]
pub struct LocalStream<T> {
    id: String,
    tracks: Vec<T>,
}

impl<T: LocalTrack> LocalStream<T> {
    pub fn new(id: impl Into<String>, tracks: Vec<T>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[T] {
        &self.tracks
    }

    pub fn first_track(&self, kind: TrackKind) -> Option<&T> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }

    /// Flip the enabled flag of the first track of `kind`.
    /// Returns the new flag, or `None` when there is no such track.
    pub fn toggle(&self, kind: TrackKind) -> Option<bool> {
        let track = self.first_track(kind)?;
        let enabled = !track.is_enabled();
        track.set_enabled(enabled);
        Some(enabled)
    }

    pub fn stop(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}
