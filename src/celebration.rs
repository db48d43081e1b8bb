//! Celebration screen shown after the invitation is accepted.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::invitation::Invitation;
use crate::reply::{ACCEPT_REPLY_MESSAGE, DeviceClass, encode_component, reply_uri};

pub const HEADLINE: &str = "I Knew You'd Say Yes!";
pub const CLOSING: &str = "Can't wait to celebrate with you!";

/// A song from the celebration playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Song {
    /// YouTube video id.
    pub id: &'static str,
    pub title: &'static str,
}

pub const PLAYLIST: [Song; 10] = [
    Song { id: "450p7goxZqg", title: "All of Me - John Legend" },
    Song { id: "2Vv-BfVoq4g", title: "Perfect - Ed Sheeran" },
    Song { id: "UfcAVejslrU", title: "A Thousand Years - Christina Perri" },
    Song { id: "lp-EO5I60KA", title: "Thinking Out Loud - Ed Sheeran" },
    Song { id: "nfWlot6h_JM", title: "Say You Won't Let Go - James Arthur" },
    Song { id: "RT8dNkD3pYU", title: "Make You Feel My Love - Adele" },
    Song { id: "qN4ooNx77u0", title: "Die With A Smile - Lady Gaga & Bruno Mars" },
    Song { id: "Mgfe5tIwOj0", title: "Marry You - Bruno Mars" },
    Song { id: "e_S9VvJM1PI", title: "Mirrors - Justin Timberlake" },
    Song { id: "fLexgOxsZu0", title: "All Of Me - John Legend (Live)" },
];

/// Everything the celebration screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct Celebration {
    pub headline: &'static str,
    pub message: String,
    pub song: Song,
    pub embed_url: String,
    /// Deep link back to the sender; absent when the link had no contact.
    pub reply_uri: Option<String>,
    pub closing: &'static str,
}

pub fn pick_song<R: Rng>(rng: &mut R) -> Song {
    // PLAYLIST is non-empty.
    *PLAYLIST.choose(rng).unwrap_or(&PLAYLIST[0])
}

/// Autoplaying, looping embed for a song. `origin` is passed through for the
/// player's postMessage checks when known.
pub fn embed_url(song: &Song, origin: Option<&str>) -> String {
    let mut url = format!(
        "https://www.youtube.com/embed/{id}?autoplay=1&mute=0&loop=1&playlist={id}&rel=0&playsinline=1",
        id = song.id
    );
    if let Some(origin) = origin.filter(|o| !o.is_empty()) {
        url.push_str("&origin=");
        url.push_str(&encode_component(origin));
    }
    url
}

pub fn happiness_message(invitation: &Invitation) -> String {
    let lead = if invitation.has_name() {
        format!("{}, you", invitation.recipient_name())
    } else {
        "You".to_string()
    };
    format!("{lead} just made me the happiest person in the world! 💕🌹")
}

impl Celebration {
    pub fn new<R: Rng>(
        invitation: &Invitation,
        rng: &mut R,
        origin: Option<&str>,
        device: DeviceClass,
    ) -> Self {
        let song = pick_song(rng);
        Self {
            headline: HEADLINE,
            message: happiness_message(invitation),
            song,
            embed_url: embed_url(&song, origin),
            reply_uri: invitation
                .sender_contact()
                .and_then(|phone| reply_uri(phone, ACCEPT_REPLY_MESSAGE, device)),
            closing: CLOSING,
        }
    }
}
