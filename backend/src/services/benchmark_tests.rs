use super::*;
use crate::models::{ShapeClass, TrajectoryPoint, VideoId};
use proptest::prelude::*;

fn trajectory(id: &str, cumulative: &[u64]) -> Trajectory {
    let mut previous = 0;
    let points = cumulative
        .iter()
        .enumerate()
        .map(|(day, &total)| {
            let point = TrajectoryPoint {
                day: day as u32,
                daily_views: total - previous,
                cumulative_views: total,
            };
            previous = total;
            point
        })
        .collect();
    Trajectory {
        video_id: VideoId::new(id),
        shape: ShapeClass::LongForm,
        points,
    }
}

#[test]
fn test_quantile_interpolates() {
    let sorted = [100.0, 200.0, 300.0];
    assert_eq!(quantile(&sorted, 0.25), Some(150.0));
    assert_eq!(quantile(&sorted, 0.5), Some(200.0));
    assert_eq!(quantile(&sorted, 0.75), Some(250.0));
    assert_eq!(quantile(&sorted, 0.0), Some(100.0));
    assert_eq!(quantile(&sorted, 1.0), Some(300.0));
}

#[test]
fn test_quantile_empty() {
    assert_eq!(quantile(&[], 0.5), None);
}

#[test]
fn test_three_trajectories_day_three() {
    let trajectories = vec![
        trajectory("a", &[10, 40, 70, 100]),
        trajectory("b", &[20, 80, 150, 200]),
        trajectory("c", &[30, 120, 200, 300]),
    ];
    let band = aggregate_band(&trajectories, BandWidth::new(50.0).unwrap());

    assert_eq!(band.len(), 4);
    let row = band[3];
    assert_eq!(row.day, 3);
    assert_eq!(row.lower_band, 150.0);
    assert_eq!(row.median, 200.0);
    assert_eq!(row.upper_band, 250.0);
    assert_eq!(row.mean, 200.0);
    assert_eq!(row.sample_count, 3);
}

#[test]
fn test_single_sample_collapses_band() {
    let band = aggregate_band(&[trajectory("a", &[500, 900])], BandWidth::default());
    for row in &band {
        assert_eq!(row.sample_count, 1);
        assert_eq!(row.lower_band, row.upper_band);
        assert_eq!(row.median, row.mean);
        assert_eq!(row.lower_band, row.median);
    }
}

#[test]
fn test_shorter_trajectories_drop_out() {
    let trajectories = vec![
        trajectory("long", &[100, 200, 300, 400, 500]),
        trajectory("short", &[50, 60]),
    ];
    let band = aggregate_band(&trajectories, BandWidth::default());

    let counts: Vec<usize> = band.iter().map(|r| r.sample_count).collect();
    assert_eq!(counts, vec![2, 2, 1, 1, 1]);
    assert_eq!(band[4].median, 500.0);
}

#[test]
fn test_rows_ordered_by_day() {
    let trajectories = vec![trajectory("a", &[1, 2, 3]), trajectory("b", &[4, 5, 6, 7, 8])];
    let band = aggregate_band(&trajectories, BandWidth::default());
    let days: Vec<u32> = band.iter().map(|r| r.day).collect();
    assert_eq!(days, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_no_trajectories_no_rows() {
    assert!(aggregate_band(&[], BandWidth::default()).is_empty());
}

#[test]
fn test_wider_band_is_wider() {
    let trajectories: Vec<Trajectory> = (1..=9)
        .map(|i| trajectory(&format!("v{}", i), &[i * 100]))
        .collect();
    let narrow = aggregate_band(&trajectories, BandWidth::new(50.0).unwrap());
    let wide = aggregate_band(&trajectories, BandWidth::new(80.0).unwrap());

    assert_eq!(narrow[0].lower_band, 300.0);
    assert_eq!(narrow[0].upper_band, 700.0);
    assert!((wide[0].lower_band - 180.0).abs() < 1e-9);
    assert!((wide[0].upper_band - 820.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn prop_band_ordering(
        totals in prop::collection::vec(prop::collection::vec(0u64..1_000_000, 1..20), 1..15),
        width in 1.0f64..=100.0,
    ) {
        let trajectories: Vec<Trajectory> = totals
            .iter()
            .enumerate()
            .map(|(i, values)| {
                let mut sorted = values.clone();
                sorted.sort_unstable();
                trajectory(&format!("v{}", i), &sorted)
            })
            .collect();

        let band = aggregate_band(&trajectories, BandWidth::new(width).unwrap());
        for row in &band {
            prop_assert!(row.sample_count > 0);
            prop_assert!(row.lower_band <= row.median);
            prop_assert!(row.median <= row.upper_band);
            prop_assert!(row.lower_band <= row.upper_band);
        }
    }
}
