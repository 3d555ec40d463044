//! Timelock driven through the runtime against the real token.

use proptest::prelude::*;
use zora_timelock::events::{ExecuteTransaction, QueueTransaction};
use zora_timelock::{signatures, transaction_hash, Timelock, GRACE_PERIOD};
use zora_token::{signatures as token_sigs, TokenConfig, VotingToken};
use zora_types::{Address, BlockEnv, Call, Hash, DAY};
use zora_vm::{abi, CallContext, Contract, ExecutionError, Host, Runtime};

fn alice() -> Address {
    Address::from_label("alice")
}

fn bob() -> Address {
    Address::from_label("bob")
}

fn carol() -> Address {
    Address::from_label("carol")
}

struct Fixture {
    rt: Runtime,
    token: Address,
    timelock: Address,
}

/// Token owned by alice, timelock administered by bob with a three day delay.
fn setup() -> Fixture {
    let mut rt = Runtime::new(BlockEnv::new(1, 1_600_000_000));
    let token = rt.deploy(
        alice(),
        VotingToken::new(&TokenConfig::zoracles(), alice()).unwrap(),
    );
    let timelock = rt.deploy(alice(), Timelock::new(bob(), 259_200).unwrap());
    Fixture { rt, token, timelock }
}

fn tx_args(call: &Call, eta: u64) -> (Address, u128, String, Vec<u8>, u64) {
    (
        call.target,
        call.value,
        call.signature.clone(),
        call.data.clone(),
        eta,
    )
}

fn queue(f: &mut Fixture, from: Address, call: &Call, eta: u64) -> Result<Hash, ExecutionError> {
    let receipt = f.rt.transact(
        from,
        abi::call(f.timelock, signatures::QUEUE_TRANSACTION, &tx_args(call, eta))?,
    )?;
    receipt.decode_output()
}

fn execute(f: &mut Fixture, from: Address, call: &Call, eta: u64) -> Result<Vec<u8>, ExecutionError> {
    let receipt = f.rt.transact(
        from,
        abi::call(f.timelock, signatures::EXECUTE_TRANSACTION, &tx_args(call, eta))?,
    )?;
    assert_eq!(receipt.events::<ExecuteTransaction>().len(), 1);
    receipt.decode_output()
}

fn owner(f: &mut Fixture) -> Address {
    f.rt
        .query(alice(), &abi::call(f.token, token_sigs::OWNER, &()).unwrap())
        .unwrap()
}

fn is_queued(f: &mut Fixture, tx_hash: Hash) -> bool {
    f.rt
        .query(
            alice(),
            &abi::call(f.timelock, signatures::QUEUED_TRANSACTIONS, &tx_hash).unwrap(),
        )
        .unwrap()
}

#[test_log::test]
fn non_owner_cannot_operate() {
    let mut f = setup();
    let timelock = f.timelock;
    f.rt.transact(
        alice(),
        abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &timelock).unwrap(),
    )
    .unwrap();

    for caller in [alice(), bob()] {
        let err = f
            .rt
            .transact(
                caller,
                abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &carol()).unwrap(),
            )
            .unwrap_err();
        assert_eq!(err.reason(), "Ownable: caller is not the owner");
    }

    let call = abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &carol()).unwrap();
    let eta = f.rt.env().timestamp + 4 * DAY;
    let err = queue(&mut f, alice(), &call, eta).unwrap_err();
    assert_eq!(
        err.reason(),
        "Timelock::queueTransaction: Call must come from admin."
    );
}

#[test_log::test]
fn transfers_ownership_after_the_delay() {
    let mut f = setup();
    let timelock = f.timelock;
    f.rt.transact(
        alice(),
        abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &timelock).unwrap(),
    )
    .unwrap();

    let call = abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &carol()).unwrap();
    let eta = f.rt.env().timestamp + 4 * DAY;
    let tx_hash = queue(&mut f, bob(), &call, eta).unwrap();
    assert_eq!(tx_hash, transaction_hash(&call, eta));
    assert!(is_queued(&mut f, tx_hash));

    f.rt.advance_time(DAY);
    let err = execute(&mut f, bob(), &call, eta).unwrap_err();
    assert_eq!(
        err.reason(),
        "Timelock::executeTransaction: Transaction hasn't surpassed time lock."
    );

    f.rt.advance_time(4 * DAY);
    execute(&mut f, bob(), &call, eta).unwrap();
    assert_eq!(owner(&mut f), carol());
    assert!(!is_queued(&mut f, tx_hash));

    let err = execute(&mut f, bob(), &call, eta).unwrap_err();
    assert_eq!(
        err.reason(),
        "Timelock::executeTransaction: Transaction hasn't been queued."
    );
}

#[test]
fn queue_must_respect_delay() {
    let mut f = setup();
    let call = abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &carol()).unwrap();
    let eta = f.rt.env().timestamp + 3 * DAY - 1;
    let err = queue(&mut f, bob(), &call, eta).unwrap_err();
    assert_eq!(
        err.reason(),
        "Timelock::queueTransaction: Estimated execution block must satisfy delay."
    );
}

#[test]
fn failed_call_keeps_transaction_queued() {
    let mut f = setup();
    // The timelock does not own the token yet, so the mint reverts
    let call = abi::call(f.token, token_sigs::MINT, &(carol(), 100u128)).unwrap();
    let eta = f.rt.env().timestamp + 3 * DAY;
    let tx_hash = queue(&mut f, bob(), &call, eta).unwrap();

    f.rt.advance_time(3 * DAY);
    let err = execute(&mut f, bob(), &call, eta).unwrap_err();
    assert_eq!(err.reason(), "Ownable: caller is not the owner");
    assert!(is_queued(&mut f, tx_hash));

    // Retry succeeds once the timelock owns the token
    let timelock = f.timelock;
    f.rt.transact(
        alice(),
        abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &timelock).unwrap(),
    )
    .unwrap();
    execute(&mut f, bob(), &call, eta).unwrap();
    let balance: u128 = f
        .rt
        .query(alice(), &abi::call(f.token, token_sigs::BALANCE_OF, &carol()).unwrap())
        .unwrap();
    assert_eq!(balance, 100);
}

#[test]
fn stale_transaction_cannot_run() {
    let mut f = setup();
    let call = abi::call(f.token, token_sigs::TRANSFER_OWNERSHIP, &carol()).unwrap();
    let eta = f.rt.env().timestamp + 3 * DAY;
    queue(&mut f, bob(), &call, eta).unwrap();

    f.rt.advance_time(3 * DAY + GRACE_PERIOD + 1);
    let err = execute(&mut f, bob(), &call, eta).unwrap_err();
    assert_eq!(err.reason(), "Timelock::executeTransaction: Transaction is stale.");
}

#[test]
fn value_is_forwarded_from_timelock_balance() {
    let mut f = setup();
    let timelock = f.timelock;
    f.rt.fund(bob(), 1_000).unwrap();
    f.rt.transact(bob(), Call::transfer(timelock, 600)).unwrap();
    assert_eq!(f.rt.balance(&timelock), 600);

    let call = Call::transfer(carol(), 250);
    let eta = f.rt.env().timestamp + 3 * DAY;
    let receipt = f
        .rt
        .transact(
            bob(),
            abi::call(timelock, signatures::QUEUE_TRANSACTION, &tx_args(&call, eta)).unwrap(),
        )
        .unwrap();
    assert_eq!(receipt.events::<QueueTransaction>()[0].call, call);

    f.rt.advance_time(3 * DAY);
    execute(&mut f, bob(), &call, eta).unwrap();
    assert_eq!(f.rt.balance(&carol()), 250);
    assert_eq!(f.rt.balance(&timelock), 350);
}

#[test]
fn delay_changes_through_queued_self_call() {
    let mut f = setup();
    let timelock = f.timelock;

    let direct = f
        .rt
        .transact(bob(), abi::call(timelock, signatures::SET_DELAY, &(5 * DAY)).unwrap())
        .unwrap_err();
    assert_eq!(direct.reason(), "Timelock::setDelay: Call must come from Timelock.");

    let call = abi::call(timelock, signatures::SET_DELAY, &(5 * DAY)).unwrap();
    let eta = f.rt.env().timestamp + 3 * DAY;
    queue(&mut f, bob(), &call, eta).unwrap();
    f.rt.advance_time(3 * DAY);
    execute(&mut f, bob(), &call, eta).unwrap();

    assert_eq!(f.rt.view(timelock, |t: &Timelock| t.delay).unwrap(), 5 * DAY);
}

/// Tries to run a queued transaction again from inside its own execution.
#[derive(Clone, Default)]
struct Replayer {
    timelock: Address,
    replay: Option<(Address, u128, String, Vec<u8>, u64)>,
}

impl Contract for Replayer {
    fn name(&self) -> &'static str {
        "Replayer"
    }

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        signature: &str,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<Vec<u8>, ExecutionError> {
        match signature {
            "arm(address,(address,uint256,string,bytes,uint256))" => {
                let (timelock, replay): (Address, (Address, u128, String, Vec<u8>, u64)) =
                    abi::decode(signature, data)?;
                self.timelock = timelock;
                self.replay = Some(replay);
                Ok(Vec::new())
            }
            "poke()" => match &self.replay {
                Some(args) => {
                    let call = abi::call(self.timelock, signatures::EXECUTE_TRANSACTION, args)?;
                    host.call(ctx.this, &call)
                }
                None => Ok(Vec::new()),
            },
            _ => Err(ExecutionError::revert("Replayer: unknown")),
        }
    }
}

#[test_log::test]
fn reentrant_execution_is_rejected() {
    let mut f = setup();
    let replayer = f.rt.deploy(carol(), Replayer::default());
    let timelock = f.timelock;

    let call = Call::new(replayer, 0, "poke()", Vec::new());
    let eta = f.rt.env().timestamp + 3 * DAY;
    f.rt.transact(
        carol(),
        abi::call(
            replayer,
            "arm(address,(address,uint256,string,bytes,uint256))",
            &(timelock, tx_args(&call, eta)),
        )
        .unwrap(),
    )
    .unwrap();
    let tx_hash = queue(&mut f, bob(), &call, eta).unwrap();

    f.rt.advance_time(3 * DAY);
    let err = execute(&mut f, bob(), &call, eta).unwrap_err();
    assert!(matches!(err, ExecutionError::ReentrancyViolation(_)));
    // Rolled back as a whole: still queued, still executable exactly once
    assert!(is_queued(&mut f, tx_hash));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn execution_only_inside_window(offset in 0u64..(40 * DAY)) {
        let mut f = setup();
        let call = abi::call(f.token, token_sigs::TOTAL_SUPPLY, &()).unwrap();
        let start = f.rt.env().timestamp;
        let eta = start + 3 * DAY;
        queue(&mut f, bob(), &call, eta).unwrap();

        f.rt.advance_time(offset);
        let now = start + offset;
        let result = execute(&mut f, bob(), &call, eta);
        prop_assert_eq!(result.is_ok(), now >= eta && now <= eta + GRACE_PERIOD);
    }
}
