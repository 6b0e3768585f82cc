use warehouse_rl::config::{AgentConfig, TrainingConfig, WarehouseConfig};
use warehouse_rl::env::{Warehouse, WarehouseMdp};
use warehouse_rl::trainer::Trainer;
use warehouse_rl::utils::moving_average;
use warehouse_rl::{Agent, QLearningAgent};

fn trainer(episodes: usize) -> Trainer {
    Trainer::new(TrainingConfig {
        episodes,
        max_steps: 200,
        eval_episodes: 20,
        log_every: 0,
        show_progress: false,
    })
}

#[test]
fn learns_a_short_path_through_the_static_floor() {
    let mut env = Warehouse::from_config(&WarehouseConfig::static_layout(), 0).unwrap();
    let mut agent = QLearningAgent::new(&AgentConfig::default()).unwrap();
    let trainer = trainer(2000);
    let results = trainer.train(&mut env, &mut agent);

    let curve = moving_average(500, &results.returns);
    assert!(curve.last().unwrap() > curve.first().unwrap());
    assert_eq!(agent.exploration_rate(), 0.05);

    let rollout = trainer.rollout(&mut env, &mut agent);
    assert!(rollout.terminated);
    // 11 moves is the Manhattan distance from (0, 5) to (6, 0)
    assert!(rollout.steps >= 11 && rollout.steps < 20, "{}", rollout.steps);
    assert!(rollout.total_return > 400.0);
}

#[test]
fn learns_to_reach_the_dock_around_a_moving_obstacle() {
    let mut env = Warehouse::from_config(&WarehouseConfig::dynamic_layout(), 7).unwrap();
    let mut agent = QLearningAgent::new(&AgentConfig::default()).unwrap();
    let trainer = trainer(3000);
    trainer.train(&mut env, &mut agent);

    let successes = (0..20)
        .filter(|_| trainer.rollout(&mut env, &mut agent).terminated)
        .count();
    assert!(successes >= 18, "{successes}/20");
    assert!(agent.policy().len() > 25);
}

#[test]
fn same_seed_same_learning_curve() {
    let run = || {
        let mut env = Warehouse::from_config(&WarehouseConfig::dynamic_layout(), 1).unwrap();
        let mut agent = QLearningAgent::new(&AgentConfig::default()).unwrap();
        let results = trainer(100).train(&mut env, &mut agent);
        (results, env.state_space().len())
    };
    let (a, states) = run();
    let (b, _) = run();
    assert_eq!(a, b);
    assert_eq!(states, 625);
}
