use crate::domain::{Movie, Rating};

struct SeedMovie {
    imdb_id: &'static str,
    title: &'static str,
    year: &'static str,
    rated: &'static str,
    released: &'static str,
    runtime: &'static str,
    genre: &'static str,
    director: &'static str,
    writer: &'static str,
    actors: &'static str,
    plot: &'static str,
    language: &'static str,
    country: &'static str,
    awards: &'static str,
    ratings: [(&'static str, &'static str); 3],
    metascore: &'static str,
    imdb_rating: &'static str,
    imdb_votes: &'static str,
}

const SEED: [SeedMovie; 5] = [
    SeedMovie {
        imdb_id: "tt0111161",
        title: "The Shawshank Redemption",
        year: "1994",
        rated: "R",
        released: "14 Oct 1994",
        runtime: "142 min",
        genre: "Drama",
        director: "Frank Darabont",
        writer: "Stephen King, Frank Darabont",
        actors: "Tim Robbins, Morgan Freeman, Bob Gunton",
        plot: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
        language: "English",
        country: "USA",
        awards: "Nominated for 7 Oscars. Another 21 wins & 36 nominations.",
        ratings: [
            ("Internet Movie Database", "9.3/10"),
            ("Rotten Tomatoes", "91%"),
            ("Metacritic", "80/100"),
        ],
        metascore: "80",
        imdb_rating: "9.3",
        imdb_votes: "2,494,248",
    },
    SeedMovie {
        imdb_id: "tt0068646",
        title: "The Godfather",
        year: "1972",
        rated: "R",
        released: "24 Mar 1972",
        runtime: "175 min",
        genre: "Crime, Drama",
        director: "Francis Ford Coppola",
        writer: "Mario Puzo, Francis Ford Coppola",
        actors: "Marlon Brando, Al Pacino, James Caan",
        plot: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
        language: "English, Italian, Latin",
        country: "USA",
        awards: "Won 3 Oscars. Another 26 wins & 30 nominations.",
        ratings: [
            ("Internet Movie Database", "9.2/10"),
            ("Rotten Tomatoes", "98%"),
            ("Metacritic", "100/100"),
        ],
        metascore: "100",
        imdb_rating: "9.2",
        imdb_votes: "1,728,398",
    },
    SeedMovie {
        imdb_id: "tt0468569",
        title: "The Dark Knight",
        year: "2008",
        rated: "PG-13",
        released: "18 Jul 2008",
        runtime: "152 min",
        genre: "Action, Crime, Drama",
        director: "Christopher Nolan",
        writer: "Jonathan Nolan, Christopher Nolan, David S. Goyer",
        actors: "Christian Bale, Heath Ledger, Aaron Eckhart",
        plot: "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
        language: "English, Mandarin",
        country: "USA, UK",
        awards: "Won 2 Oscars. Another 157 wins & 163 nominations.",
        ratings: [
            ("Internet Movie Database", "9.0/10"),
            ("Rotten Tomatoes", "94%"),
            ("Metacritic", "84/100"),
        ],
        metascore: "84",
        imdb_rating: "9.0",
        imdb_votes: "2,450,723",
    },
    SeedMovie {
        imdb_id: "tt0137523",
        title: "Fight Club",
        year: "1999",
        rated: "R",
        released: "15 Oct 1999",
        runtime: "139 min",
        genre: "Drama",
        director: "David Fincher",
        writer: "Chuck Palahniuk, Jim Uhls",
        actors: "Brad Pitt, Edward Norton, Meat Loaf",
        plot: "An insomniac office worker and a devil-may-care soapmaker form an underground fight club that evolves into something much, much more.",
        language: "English",
        country: "USA, Germany",
        awards: "Nominated for 1 Oscar. Another 11 wins & 37 nominations.",
        ratings: [
            ("Internet Movie Database", "8.8/10"),
            ("Rotten Tomatoes", "79%"),
            ("Metacritic", "66/100"),
        ],
        metascore: "66",
        imdb_rating: "8.8",
        imdb_votes: "1,895,610",
    },
    SeedMovie {
        imdb_id: "tt0133093",
        title: "The Matrix",
        year: "1999",
        rated: "R",
        released: "31 Mar 1999",
        runtime: "136 min",
        genre: "Action, Sci-Fi",
        director: "Lana Wachowski, Lilly Wachowski",
        writer: "Lana Wachowski, Lilly Wachowski",
        actors: "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
        plot: "A computer hacker learns from mysterious rebels about the true nature of his reality and his role in the war against its controllers.",
        language: "English",
        country: "USA",
        awards: "Won 4 Oscars. Another 38 wins & 51 nominations.",
        ratings: [
            ("Internet Movie Database", "8.7/10"),
            ("Rotten Tomatoes", "88%"),
            ("Metacritic", "73/100"),
        ],
        metascore: "73",
        imdb_rating: "8.7",
        imdb_votes: "1,715,254",
    },
];

/// The five records loaded by the "add predefined movies" action.
pub fn predefined_movies() -> Vec<Movie> {
    SEED.iter().map(SeedMovie::to_movie).collect()
}

impl SeedMovie {
    fn to_movie(&self) -> Movie {
        Movie {
            imdb_id: self.imdb_id.into(),
            title: self.title.into(),
            year: self.year.into(),
            rated: self.rated.into(),
            released: self.released.into(),
            runtime: self.runtime.into(),
            genre: self.genre.into(),
            director: self.director.into(),
            writer: self.writer.into(),
            actors: self.actors.into(),
            plot: self.plot.into(),
            language: self.language.into(),
            country: self.country.into(),
            awards: self.awards.into(),
            ratings: Some(
                self.ratings
                    .iter()
                    .map(|(source, value)| Rating::new(*source, *value))
                    .collect(),
            ),
            metascore: self.metascore.into(),
            imdb_rating: self.imdb_rating.into(),
            imdb_votes: self.imdb_votes.into(),
            kind: "movie".into(),
            total_seasons: None,
            response: "True".into(),
        }
    }
}
