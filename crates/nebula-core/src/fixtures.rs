//! Sample catalog rows for tests.

use crate::model::Song;

/// A small catalog with three Ed Sheeran tracks first, then a mix of pop,
/// hip hop and rock rows.
#[must_use]
pub fn sample_songs() -> Vec<Song> {
    vec![
        Song::new("Shape of You", "Ed Sheeran", "÷ (Deluxe)")
            .with_genres("pop, singer-songwriter pop, uk pop")
            .with_popularity(87, 90)
            .with_followers(115_000_000)
            .with_duration_min(3.9)
            .with_album_total_tracks(16),
        Song::new("Perfect", "Ed Sheeran", "÷ (Deluxe)")
            .with_genres("pop, singer-songwriter pop, uk pop")
            .with_popularity(85, 90)
            .with_followers(115_000_000)
            .with_duration_min(4.39)
            .with_album_total_tracks(16),
        Song::new("Castle on the Hill", "Ed Sheeran", "÷ (Deluxe)")
            .with_genres("pop, singer-songwriter pop, uk pop")
            .with_popularity(78, 90)
            .with_followers(115_000_000)
            .with_duration_min(4.35)
            .with_album_total_tracks(16),
        Song::new("New Rules", "Dua Lipa", "Dua Lipa (Deluxe)")
            .with_genres("dance pop, pop, uk pop")
            .with_popularity(80, 86)
            .with_followers(40_000_000)
            .with_duration_min(3.49)
            .with_album_total_tracks(17),
        Song::new("Don't Start Now", "Dua Lipa", "Future Nostalgia")
            .with_genres("dance pop, pop, uk pop")
            .with_popularity(84, 86)
            .with_followers(40_000_000)
            .with_duration_min(3.05)
            .with_album_total_tracks(11),
        Song::new("Blinding Lights", "The Weeknd", "After Hours")
            .with_genres("canadian contemporary r&b, canadian pop, pop")
            .with_popularity(91, 94)
            .with_followers(80_000_000)
            .with_duration_min(3.33)
            .with_album_total_tracks(14),
        Song::new("Starboy", "The Weeknd", "Starboy")
            .with_genres("canadian contemporary r&b, canadian pop, pop")
            .with_popularity(88, 94)
            .with_followers(80_000_000)
            .with_duration_min(3.84)
            .with_album_total_tracks(18)
            .with_explicit(true),
        Song::new("HUMBLE.", "Kendrick Lamar", "DAMN.")
            .with_genres("conscious hip hop, hip hop, rap, west coast rap")
            .with_popularity(83, 88)
            .with_followers(30_000_000)
            .with_duration_min(2.95)
            .with_album_total_tracks(14)
            .with_explicit(true),
        Song::new("DNA.", "Kendrick Lamar", "DAMN.")
            .with_genres("conscious hip hop, hip hop, rap, west coast rap")
            .with_popularity(79, 88)
            .with_followers(30_000_000)
            .with_duration_min(3.1)
            .with_album_total_tracks(14)
            .with_explicit(true),
        Song::new("bad guy", "Billie Eilish", "WHEN WE ALL FALL ASLEEP, WHERE DO WE GO?")
            .with_genres("art pop, electropop, pop")
            .with_popularity(86, 89)
            .with_followers(95_000_000)
            .with_duration_min(3.23)
            .with_album_total_tracks(14),
        Song::new("Hello", "Adele", "25")
            .with_genres("british soul, pop, uk pop")
            .with_popularity(78, 85)
            .with_followers(55_000_000)
            .with_duration_min(4.92)
            .with_album_total_tracks(11),
        Song::new("Rolling in the Deep", "Adele", "21")
            .with_genres("british soul, pop, uk pop")
            .with_popularity(80, 85)
            .with_followers(55_000_000)
            .with_duration_min(3.8)
            .with_album_total_tracks(11),
        Song::new("Yellow", "Coldplay", "Parachutes")
            .with_genres("permanent wave, pop, rock")
            .with_popularity(84, 87)
            .with_followers(50_000_000)
            .with_duration_min(4.45)
            .with_album_total_tracks(10),
    ]
}
