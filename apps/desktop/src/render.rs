use std::fmt::Write;

use shared::domain::{Movie, SearchItem};

/// Labelled detail card, one field per line, in display order.
pub fn movie_card(movie: &Movie) -> String {
    let fields = [
        ("Title", &movie.title),
        ("Year", &movie.year),
        ("Rated", &movie.rated),
        ("Released", &movie.released),
        ("Runtime", &movie.runtime),
        ("Genre", &movie.genre),
        ("Director", &movie.director),
        ("Writer", &movie.writer),
        ("Actors", &movie.actors),
        ("Plot", &movie.plot),
    ];
    let mut card = String::new();
    for (label, value) in fields {
        let _ = writeln!(card, "{label:<9} {value}");
    }
    card
}

pub fn search_row(item: &SearchItem) -> String {
    format!("{} ({}) [{}]", item.title, item.year, item.kind)
}

pub fn catalogue_row(movie: &Movie) -> String {
    format!("{}  {} ({})  {}", movie.imdb_id, movie.title, movie.year, movie.actors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::seed::predefined_movies;

    #[test]
    fn card_lists_fields_in_order() {
        let godfather = predefined_movies().remove(1);
        let card = movie_card(&godfather);
        let labels: Vec<_> = card
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            labels,
            [
                "Title", "Year", "Rated", "Released", "Runtime", "Genre", "Director", "Writer",
                "Actors", "Plot"
            ]
        );
        assert!(card.contains("Actors    Marlon Brando, Al Pacino, James Caan"));
    }

    #[test]
    fn search_row_shows_title_year_and_type() {
        let item = SearchItem {
            title: "Alien".into(),
            year: "1979".into(),
            imdb_id: "tt0078748".into(),
            kind: "movie".into(),
            poster: "N/A".into(),
        };
        assert_eq!(search_row(&item), "Alien (1979) [movie]");
    }
}
