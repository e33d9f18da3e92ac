use nebula_life_core::{Board, Cell, DomainBounds, SeedStyle, MIN_SEED_CELLS};
use nebula_life_system_seeding::{freehand, FreehandSeed, SeedError, SeedGenerator, SeedParameters};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn generator(columns: u32, rows: u32, population: f64) -> SeedGenerator {
    SeedGenerator::new(
        DomainBounds::new(columns, rows),
        SeedParameters {
            population,
            ..SeedParameters::default()
        },
    )
}

fn row(y: i32, xs: std::ops::Range<i32>) -> Board {
    xs.map(|x| Cell::new(x, y)).collect()
}

#[test]
fn default_parameters_scale_margins_by_pixel_size() {
    let parameters = SeedParameters::default();
    assert_eq!(parameters.population, 0.06);
    assert_eq!(parameters.outer_margin, 40.0);
    assert_eq!(parameters.inner_margin, 120.0);

    let coarse = SeedParameters::new(0.1, 4);
    assert_eq!(coarse.outer_margin, 20.0);
    assert_eq!(coarse.inner_margin, 60.0);
}

#[test]
fn sample_count_floors_the_population_share() {
    assert_eq!(generator(1000, 250, 0.06).sample_count(), 15_000);
    assert_eq!(generator(10, 10, 0.055).sample_count(), 5);
    assert_eq!(generator(10, 10, 0.0).sample_count(), 0);
    assert_eq!(generator(10, 10, -1.0).sample_count(), 0);
}

#[test]
fn random_with_zero_population_is_empty() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(generator(50, 50, 0.0).random(&mut rng).is_empty());
}

#[test]
fn random_cells_stay_inside_inclusive_bounds() {
    let seeds = generator(30, 20, 1.0);
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let board = seeds.random(&mut rng);
    assert!(!board.is_empty());
    assert!(board.len() <= 600, "duplicates collapse, never add");
    assert!(board.len() as u64 <= seeds.bounds().distinct_cells());
    for cell in &board {
        assert!(seeds.bounds().contains(*cell), "{cell:?} outside domain");
    }
}

#[test]
fn identical_rng_seeds_produce_identical_boards() {
    let seeds = generator(120, 80, 0.2);
    for style in [SeedStyle::Random, SeedStyle::Circle] {
        let first = seeds
            .generate(style, &mut ChaCha8Rng::seed_from_u64(7))
            .expect("generated style");
        let second = seeds
            .generate(style, &mut ChaCha8Rng::seed_from_u64(7))
            .expect("generated style");
        assert_eq!(first, second, "{style} must be reproducible");
    }
}

#[test]
fn circle_keeps_only_annulus_cells() {
    let seeds = SeedGenerator::new(
        DomainBounds::new(400, 200),
        SeedParameters {
            population: 1.0,
            outer_margin: 20.0,
            inner_margin: 60.0,
        },
    );
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let board = seeds.circle(&mut rng);
    assert!(!board.is_empty());

    let in_ring = |cell: &Cell, cx: i32| {
        let dx = f64::from(cell.x() - cx);
        let dy = f64::from(cell.y() - 100);
        let distance = dx.hypot(dy);
        (40.0..=80.0).contains(&distance)
    };
    for cell in &board {
        assert!(
            in_ring(cell, 100) || in_ring(cell, 300),
            "{cell:?} lies outside both annuli"
        );
    }
    assert!(board.iter().any(|cell| cell.x() < 200));
    assert!(board.iter().any(|cell| cell.x() > 200));
}

#[test]
fn circle_edge_traces_forty_shifted_rings() {
    let board = generator(1000, 500, 0.06).circle_edge();
    assert!(board.contains(Cell::new(400, 250)), "rightmost point of first ring");
    assert!(board.contains(Cell::new(100, 250)), "leftmost point of first ring");
    assert!(board.contains(Cell::new(1180, 250)), "rightmost point of last ring");
    for cell in &board {
        assert!((100..=400).contains(&cell.y()), "{cell:?} off every ring");
    }
}

#[test]
fn vertical_places_four_full_height_lines() {
    let board = generator(40, 10, 0.06).vertical();
    assert_eq!(board.len(), 40);
    for x in [5, 15, 25, 35] {
        for y in 0..10 {
            assert!(board.contains(Cell::new(x, y)));
        }
        assert!(!board.contains(Cell::new(x, 10)), "last row is excluded");
    }
}

#[test]
fn horizontal_repeats_every_sixty_four_rows() {
    let board = generator(10, 200, 0.06).horizontal();
    let expected = row(32, 0..10).union(&row(96, 0..10)).union(&row(160, 0..10));
    assert_eq!(board, expected);
}

#[test]
fn rectangles_are_four_closed_outlines() {
    let board = generator(20, 20, 0.06).rectangles();
    assert_eq!(board.len(), 48);
    for (left, top) in [(4, 4), (4, 12), (14, 12), (14, 4)] {
        assert!(board.contains(Cell::new(left, top)));
        assert!(board.contains(Cell::new(left + 2, top + 4)), "far corner");
        assert!(!board.contains(Cell::new(left + 1, top + 2)), "interior");
    }
}

#[test]
fn squares_are_twelve_outlines_in_two_rows() {
    let board = generator(60, 20, 0.06).squares();
    assert_eq!(board.len(), 192);
    for top in [4, 12] {
        for k in 0..6 {
            let left = 2 + 8 * k;
            assert!(board.contains(Cell::new(left, top)));
            assert!(board.contains(Cell::new(left + 4, top + 4)));
            assert!(!board.contains(Cell::new(left + 2, top + 2)));
        }
    }
}

#[test]
fn whole_centers_a_square_on_the_short_side() {
    let square = generator(20, 20, 0.06).whole();
    assert_eq!(square.len(), 80);
    assert!(square.contains(Cell::new(20, 20)));

    let wide = generator(40, 10, 0.06).whole();
    assert_eq!(wide.len(), 40);
    assert!(wide.contains(Cell::new(15, 0)));
    assert!(wide.contains(Cell::new(25, 10)));
    assert!(!wide.contains(Cell::new(14, 0)));
}

#[test]
fn freehand_cannot_be_generated() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    assert_eq!(
        generator(20, 20, 0.06).generate(SeedStyle::Freehand, &mut rng),
        Err(SeedError::RequiresDrawing(SeedStyle::Freehand))
    );
}

#[test]
fn every_generated_style_is_dispatched() {
    let seeds = generator(200, 120, 0.1);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for style in SeedStyle::ALL.into_iter().filter(|style| style.is_generated()) {
        let board = seeds.generate(style, &mut rng).expect("generated style");
        assert!(!board.is_empty(), "{style} produced an empty board");
    }
}

#[test]
fn freehand_without_existing_board_uses_drawing_verbatim() {
    let drawn = row(3, 0..150);
    let seed = freehand(None, drawn.clone());
    assert!(seed.is_viable());
    assert_eq!(seed.into_board(), drawn);
}

#[test]
fn freehand_unions_with_existing_board() {
    let existing = row(1, 0..60);
    let drawn = row(2, 0..60);
    match freehand(Some(&existing), drawn) {
        FreehandSeed::Viable(board) => assert_eq!(board.len(), 120),
        FreehandSeed::Insufficient(board) => panic!("{} cells rejected", board.len()),
    }
}

#[test]
fn sparse_freehand_is_insufficient() {
    let drawn = row(0, 0..(MIN_SEED_CELLS as i32 - 1));
    let seed = freehand(None, drawn);
    assert!(!seed.is_viable());
    assert_eq!(seed.into_board().len(), MIN_SEED_CELLS - 1);

    let overlapping = row(0, 0..60);
    let seed = freehand(Some(&overlapping), row(0, 30..90));
    assert_eq!(seed, FreehandSeed::Insufficient(row(0, 0..90)));
}
