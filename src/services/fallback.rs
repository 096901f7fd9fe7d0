//! Curated recommendations served when no generator is configured or the
//! generated output cannot be used.

use rand::seq::SliceRandom;

use crate::models::recommendation::RecommendationItem;

struct Seed {
    title: &'static str,
    reason: &'static str,
    media_type: &'static str,
    description: &'static str,
    personalized_reason: &'static str,
}

const CATALOG: [Seed; 14] = [
    Seed {
        title: "Attack on Titan",
        // The only templated line in the catalog; quotes the caller's
        // watchlist size.
        reason: "Based on your {total} anime watchlist, you seem to enjoy intense storytelling and complex narratives. Attack on Titan offers a masterful blend of action, mystery, and emotional depth that would perfectly complement your collection.",
        media_type: "TV",
        description: "Humanity's last stand against giant humanoid creatures in a post-apocalyptic world.",
        personalized_reason: "If you enjoyed the dramatic storytelling in your list, you'll love this because it delivers one of the most compelling narratives in anime history.",
    },
    Seed {
        title: "Death Note",
        reason: "Your watchlist shows an appreciation for psychological depth and strategic thinking. Death Note is a masterpiece of psychological thriller that will keep you on the edge of your seat with its brilliant mind games and moral complexity.",
        media_type: "TV",
        description: "A high school student finds a supernatural notebook that can kill anyone whose name is written in it.",
        personalized_reason: "If you liked the strategic elements in your anime, you'll love this because it's essentially a high-stakes chess game between genius minds.",
    },
    Seed {
        title: "Fullmetal Alchemist: Brotherhood",
        reason: "Given your diverse anime collection, you'd appreciate this epic adventure that combines fantasy, action, and deep emotional storytelling. It's considered one of the most complete anime experiences ever created.",
        media_type: "TV",
        description: "Two brothers seek to restore their bodies after a failed alchemical experiment.",
        personalized_reason: "If you enjoyed the world-building in your list, you'll love this because it creates one of the most detailed and consistent fantasy worlds in anime.",
    },
    Seed {
        title: "Demon Slayer",
        reason: "Your watchlist indicates you enjoy modern anime with stunning visuals and compelling characters. Demon Slayer offers breathtaking animation quality and emotional storytelling that would be a perfect addition to your collection.",
        media_type: "TV",
        description: "A young man becomes a demon slayer to save his sister and avenge his family.",
        personalized_reason: "If you appreciated the visual quality in your anime, you'll love this because it features some of the most beautiful animation ever produced.",
    },
    Seed {
        title: "One Punch Man",
        reason: "Based on your anime preferences, you'd enjoy this unique take on superhero stories that combines humor, action, and social commentary. It's a refreshing break from traditional anime tropes while still being incredibly entertaining.",
        media_type: "TV",
        description: "A hero who can defeat any opponent with a single punch struggles with boredom and recognition.",
        personalized_reason: "If you liked the comedy elements in your list, you'll love this because it's one of the funniest and most self-aware anime ever made.",
    },
    Seed {
        title: "My Hero Academia",
        reason: "Your watchlist suggests you enjoy character-driven stories with growth and development. My Hero Academia offers a perfect blend of superhero action, character development, and emotional storytelling that would resonate with your taste.",
        media_type: "TV",
        description: "A world where people with superpowers train to become heroes.",
        personalized_reason: "If you enjoyed character development in your anime, you'll love this because it shows incredible growth from weak to strong characters.",
    },
    Seed {
        title: "Hunter x Hunter",
        reason: "Your anime collection shows an appreciation for complex world-building and strategic battles. Hunter x Hunter delivers intricate storytelling with some of the most well-thought-out power systems and character development in anime.",
        media_type: "TV",
        description: "A young boy embarks on a journey to become a Hunter and find his father.",
        personalized_reason: "If you liked strategic elements in your list, you'll love this because it has some of the most intelligent battle strategies ever conceived.",
    },
    Seed {
        title: "Steins;Gate",
        reason: "Based on your watchlist, you seem to appreciate complex narratives and psychological depth. Steins;Gate is a masterpiece of time travel storytelling that combines science fiction with deep emotional resonance.",
        media_type: "TV",
        description: "A scientist accidentally discovers time travel and must prevent a dystopian future.",
        personalized_reason: "If you enjoyed complex storytelling in your anime, you'll love this because it's one of the most intricately plotted anime ever made.",
    },
    Seed {
        title: "Code Geass",
        reason: "Your anime preferences indicate you enjoy strategic thinking and complex political narratives. Code Geass offers a brilliant mix of mecha action, political intrigue, and psychological warfare that would captivate your attention.",
        media_type: "TV",
        description: "A prince uses supernatural powers to lead a rebellion against an empire.",
        personalized_reason: "If you liked strategic mind games in your list, you'll love this because it features some of the most brilliant tactical thinking in anime.",
    },
    Seed {
        title: "Parasyte",
        reason: "Your watchlist shows you appreciate dark themes and psychological horror. Parasyte delivers a unique blend of body horror, philosophical questions, and emotional storytelling that would appeal to your darker tastes.",
        media_type: "TV",
        description: "A high school student's hand is taken over by an alien parasite.",
        personalized_reason: "If you enjoyed dark themes in your anime, you'll love this because it explores deep philosophical questions about humanity and survival.",
    },
    Seed {
        title: "Mob Psycho 100",
        reason: "Based on your diverse anime collection, you'd appreciate this unique take on supernatural powers that combines humor, action, and deep character development. It's both entertaining and emotionally resonant.",
        media_type: "TV",
        description: "A powerful psychic tries to live a normal life while dealing with supernatural threats.",
        personalized_reason: "If you enjoyed character growth in your list, you'll love this because it shows incredible personal development and self-acceptance.",
    },
    Seed {
        title: "The Promised Neverland",
        reason: "Your watchlist indicates you enjoy psychological thrillers and strategic thinking. The Promised Neverland offers a masterful blend of horror, strategy, and emotional storytelling that will keep you on the edge of your seat.",
        media_type: "TV",
        description: "Children discover their orphanage is actually a farm for monsters.",
        personalized_reason: "If you liked psychological elements in your anime, you'll love this because it's one of the most intense psychological thrillers in anime.",
    },
    Seed {
        title: "Jujutsu Kaisen",
        reason: "Your anime preferences show you enjoy modern action with stunning visuals and compelling characters. Jujutsu Kaisen offers breathtaking animation, complex power systems, and emotional depth that would be perfect for your collection.",
        media_type: "TV",
        description: "A teenager becomes a sorcerer to fight curses and save his friend.",
        personalized_reason: "If you appreciated modern animation quality in your list, you'll love this because it features some of the most stunning fight scenes ever animated.",
    },
    Seed {
        title: "Vinland Saga",
        reason: "Based on your watchlist, you seem to appreciate historical settings and complex character development. Vinland Saga offers a masterful blend of historical accuracy, brutal action, and deep philosophical themes that would resonate with your taste.",
        media_type: "TV",
        description: "A young Viking seeks revenge in medieval Europe.",
        personalized_reason: "If you enjoyed character development in your anime, you'll love this because it shows one of the most profound character transformations in anime history.",
    },
];

fn rendered_catalog(total_tracked: usize) -> Vec<RecommendationItem> {
    let total = total_tracked.to_string();
    CATALOG
        .iter()
        .map(|seed| RecommendationItem {
            title: seed.title.to_string(),
            reason: seed.reason.replace("{total}", &total),
            media_type: seed.media_type.to_string(),
            description: seed.description.to_string(),
            personalized_reason: seed.personalized_reason.to_string(),
        })
        .collect()
}

/// Five random picks from the curated catalog.
#[must_use]
pub fn picks(total_tracked: usize) -> Vec<RecommendationItem> {
    let mut items = rendered_catalog(total_tracked);
    let mut rng = rand::rng();
    items.shuffle(&mut rng);
    items.truncate(5);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_renders_without_leftover_placeholders() {
        let items = rendered_catalog(7);
        assert_eq!(items.len(), 14);
        assert!(items.iter().all(|item| !item.reason.contains("{total}")));

        let titan = items
            .iter()
            .find(|item| item.title == "Attack on Titan")
            .unwrap();
        assert!(titan.reason.contains("your 7 anime watchlist"));
    }

    #[test]
    fn picks_returns_five_distinct_catalog_titles() {
        let items = picks(3);
        assert_eq!(items.len(), 5);

        let mut titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), 5);

        for title in titles {
            assert!(CATALOG.iter().any(|seed| seed.title == title));
        }
    }
}
