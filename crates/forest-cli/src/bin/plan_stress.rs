use anyhow::Result;
use forest_cli::config::Config;
use forest_core::{
    plan, Coordinate, CostModel, GridConfig, PlanRequest, PlannerConfig, SearchConfig,
    ThresholdPolicy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct StressScenario {
    name: &'static str,
    rows: usize,
    cols: usize,
    obstacle_density: f64,
    weighted: bool,
}

fn main() -> Result<()> {
    let env = Config::from_env();
    forest_cli::init_tracing(env.json_logs)?;

    let scenarios = vec![
        StressScenario {
            name: "Sparse canopy 256x256",
            rows: 256,
            cols: 256,
            obstacle_density: 0.10,
            weighted: false,
        },
        StressScenario {
            name: "Dense canopy 512x512 weighted",
            rows: 512,
            cols: 512,
            obstacle_density: 0.30,
            weighted: true,
        },
        StressScenario {
            name: "Aerial tile 1000x1000",
            rows: 1000,
            cols: 1000,
            obstacle_density: 0.20,
            weighted: false,
        },
        StressScenario {
            name: "Aerial tile 1000x1000 weighted",
            rows: 1000,
            cols: 1000,
            obstacle_density: 0.20,
            weighted: true,
        },
    ];

    for scenario in scenarios {
        println!("\n=== {} ===", scenario.name);
        let raster = synthetic_terrain(&scenario, 0xF0_2E57);
        let config = PlannerConfig {
            grid: GridConfig {
                threshold: ThresholdPolicy::default(),
                cost_model: if scenario.weighted {
                    CostModel::Weighted {
                        base_cost: 1.0,
                        canopy_weight: 4.0,
                    }
                } else {
                    CostModel::default()
                },
            },
            search: SearchConfig {
                expansion_budget: env.expansion_budget,
                ..SearchConfig::default()
            },
        };
        let request = PlanRequest::new(
            Coordinate::new(0, 0),
            Coordinate::new(scenario.rows - 1, scenario.cols - 1),
        );

        match plan(&raster, &request, &config) {
            Ok(result) => println!(
                "Result: {:?} | length={} cost={:.2} nodes={} coverage={:.1}% time={:.1}ms",
                result.status,
                result.path_length,
                result.total_cost,
                result.nodes_expanded,
                result.coverage_ratio,
                result.elapsed_ms
            ),
            Err(err) => println!("Result: FAIL ({err})"),
        }
    }

    Ok(())
}

/// Random blobs of obstacles over a brightness gradient. Intensity 0 is an
/// obstacle; the corners are kept open.
fn synthetic_terrain(scenario: &StressScenario, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (rows, cols) = (scenario.rows, scenario.cols);
    let mut raster: Vec<Vec<u8>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let gradient = ((row + col) * 200 / (rows + cols)) as u8;
                    gradient.saturating_add(rng.random_range(1..=55))
                })
                .collect()
        })
        .collect();

    let blob_count = (rows * cols) as f64 * scenario.obstacle_density / 20.0;
    for _ in 0..blob_count as usize {
        let center_row = rng.random_range(0..rows);
        let center_col = rng.random_range(0..cols);
        let radius = rng.random_range(1..=3usize);
        for row in center_row.saturating_sub(radius)..(center_row + radius + 1).min(rows) {
            for col in center_col.saturating_sub(radius)..(center_col + radius + 1).min(cols) {
                raster[row][col] = 0;
            }
        }
    }

    raster[0][0] = u8::MAX;
    raster[rows - 1][cols - 1] = u8::MAX;
    raster
}
