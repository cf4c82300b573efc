//! Given-When-Then harness for reducers
//!
//! Reducers are pure, so a test is: seed a state, replay a few actions, reduce
//! one more and inspect what came out. No runtime is involved.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use luxelane_core::{effect::Effect, reducer::Reducer};

/// Check run against the final state
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Check run against the effects of the action under test
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Builder describing a single reducer step
///
/// # Example
///
/// ```ignore
/// use luxelane_testing::ReducerTest;
///
/// ReducerTest::new(StorefrontReducer::new())
///     .with_env(test_environment())
///     .given_state(StorefrontState::default())
///     .given_actions(vec![StorefrontAction::AddToCart { product: ring() }])
///     .when_action(StorefrontAction::IncrementQuantity { product_id: 1 })
///     .then_state(|state| {
///         assert_eq!(state.cart_quantity(1), 2);
///     })
///     .then_effects(|effects| {
///         assertions::assert_no_effects(effects);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    setup_actions: Vec<A>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            setup_actions: Vec::new(),
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Starting state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Actions reduced before the action under test (Given)
    ///
    /// Their effects are discarded.
    #[must_use]
    pub fn given_actions(mut self, actions: Vec<A>) -> Self {
        self.setup_actions = actions;
        self
    }

    /// The action whose outcome is checked (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Check the state after the action (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Check the effects returned for the action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Reduce and run every check
    ///
    /// # Panics
    ///
    /// Panics when a builder step was skipped or a check fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("given_state() was not called");

        let action = self.action.expect("when_action() was not called");

        let env = self
            .environment
            .expect("with_env() was not called");

        for setup in self.setup_actions {
            let _ = self.reducer.reduce(&mut state, setup, &env);
        }

        let effects = self.reducer.reduce(&mut state, action, &env);

        self.state_assertions
            .into_iter()
            .for_each(|check| check(&state));
        self.effect_assertions
            .into_iter()
            .for_each(|check| check(&effects));
    }
}

/// Effect checks for use inside `then_effects`
///
/// Searches descend into `Parallel` and `Cancellable` wrappers.
pub mod assertions {
    use luxelane_core::effect::{Effect, EffectId};

    fn any_effect<A>(effects: &[Effect<A>], predicate: &dyn Fn(&Effect<A>) -> bool) -> bool {
        effects.iter().any(|effect| {
            predicate(effect)
                || match effect {
                    Effect::Parallel(inner) => {
                        any_effect(inner, predicate)
                    },
                    Effect::Cancellable { effect, .. } => {
                        any_effect(std::slice::from_ref(effect.as_ref()), predicate)
                    },
                    _ => false,
                }
        })
    }

    /// Nothing to run: empty, or only `Effect::None`
    ///
    /// # Panics
    ///
    /// Panics on any other effect.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, got {}: {effects:?}",
            effects.len()
        );
    }

    /// Exact number of top-level effects
    ///
    /// # Panics
    ///
    /// Panics on a different count.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {expected} effects, got {}",
            effects.len()
        );
    }

    /// Some effect, possibly nested, does async work
    ///
    /// # Panics
    ///
    /// Panics if no `Future` effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            any_effect(effects, &|e: &Effect<A>| matches!(e, Effect::Future(_))),
            "Expected a Future effect, found none"
        );
    }

    /// Assert that no Future effect was produced
    ///
    /// # Panics
    ///
    /// Panics if a Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            !any_effect(effects, &|e: &Effect<A>| matches!(e, Effect::Future(_))),
            "Expected no Future effect, but found one"
        );
    }

    /// Assert that an effect is scheduled under the given cancellation id
    ///
    /// # Panics
    ///
    /// Panics if no `Cancellable` effect with `id` is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_cancellable_effect<A>(effects: &[Effect<A>], id: EffectId) {
        assert!(
            any_effect(
                effects,
                &|e: &Effect<A>| matches!(e, Effect::Cancellable { id: found, .. } if *found == id)
            ),
            "Expected a Cancellable effect with id {id}, but none found"
        );
    }

    /// Assert that the effects cancel the given id
    ///
    /// # Panics
    ///
    /// Panics if no `Cancel` effect for `id` is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_cancel_effect<A>(effects: &[Effect<A>], id: EffectId) {
        assert!(
            any_effect(effects, &|e: &Effect<A>| matches!(e, Effect::Cancel(found) if *found == id)),
            "Expected Effect::Cancel({id}), but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxelane_core::effect::{Effect, EffectId};
    use luxelane_core::reducer::Reducer;
    use std::time::Duration;

    const TICK: EffectId = EffectId::new("tick");

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        Schedule,
        Stop,
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> smallvec::SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec::smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.count -= 1;
                    smallvec::smallvec![Effect::None]
                },
                TestAction::Schedule => smallvec::smallvec![Effect::Parallel(vec![
                    Effect::Delay {
                        duration: Duration::from_millis(5),
                        action: Box::new(TestAction::Increment),
                    }
                    .cancellable(TICK),
                    Effect::Future(Box::pin(async { None })),
                ])],
                TestAction::Stop => smallvec::smallvec![Effect::Cancel(TICK)],
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_given_actions() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 5 })
            .given_actions(vec![TestAction::Increment, TestAction::Increment])
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 6);
            })
            .run();
    }

    #[test]
    fn test_nested_effect_assertions() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Schedule)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_cancellable_effect(effects, TICK);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_cancel_assertion() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Stop)
            .then_effects(|effects| {
                assertions::assert_has_cancel_effect(effects, TICK);
                assertions::assert_no_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<TestAction>(&[Effect::None]);
        assertions::assert_no_effects::<TestAction>(&[]);
    }
}
