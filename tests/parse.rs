use pretty_assertions::assert_eq;

use tradeconf::errors::*;
use tradeconf::parse::*;

const JEPQ_BLOCK: &str = "02/28/2025    Sell to Open
Trade Details
JEPQ 03/21/2025 53.00 P
PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25
1
$0.22    $0.66    $21.34";

#[test]
fn parses_canonical_block() -> Result<()> {
    let t = parse_transaction(JEPQ_BLOCK)?;

    assert_eq!("02/28/2025", t.date);
    assert_eq!("Sell to Open", t.action);
    assert_eq!(
        "JEPQ 03/21/2025 53.00 P PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25",
        t.description
    );
    assert_eq!("1", t.quantity);
    assert_eq!("$0.22", t.price);
    assert_eq!("$0.66", t.fees);
    assert_eq!("$21.34", t.amount);
    assert_eq!(Some("JEPQ".to_owned()), t.symbol);
    assert_eq!(Some("03/21/2025".to_owned()), t.exp_date);
    assert_eq!(Some("53.00".to_owned()), t.strike);
    assert_eq!(Some("P".to_owned()), t.option_type);
    assert_eq!(Some(5300.0), t.cash_deployed);
    Ok(())
}

#[test]
fn parsing_is_idempotent() -> Result<()> {
    assert_eq!(parse_transaction(JEPQ_BLOCK)?, parse_transaction(JEPQ_BLOCK)?);
    Ok(())
}

#[test]
fn five_lines_are_insufficient() {
    let block = "02/28/2025    Sell to Open
Trade Details
JEPQ 03/21/2025 53.00 P
PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25
1";
    match parse_transaction(block) {
        Err(Error(ErrorKind::InsufficientLines(found), _)) => assert_eq!(5, found),
        r => panic!("expected InsufficientLines, got {:?}", r),
    }
}

#[test]
fn blank_lines_do_not_count() {
    // blanks are dropped before counting, so this is still a 5 line block
    let block = "02/28/2025    Sell to Open

Trade Details

JEPQ 03/21/2025 53.00 P

PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25

1";
    match parse_transaction(block) {
        Err(Error(ErrorKind::InsufficientLines(found), _)) => assert_eq!(5, found),
        r => panic!("expected InsufficientLines, got {:?}", r),
    }
}

#[test]
fn price_line_must_have_three_tokens() {
    let block = "02/28/2025    Sell to Open
Trade Details
JEPQ 03/21/2025 53.00 P
PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25
1
$0.22    $0.66";
    match parse_transaction(block) {
        Err(Error(ErrorKind::MalformedPriceLine(line), _)) => assert_eq!("$0.22    $0.66", line),
        r => panic!("expected MalformedPriceLine, got {:?}", r),
    }
}

#[test]
fn short_description_degrades_to_partial_record() -> Result<()> {
    let block = "02/28/2025    Buy
Trade Details
FOO
BAR BAZ
10
$1.00    $0.00    $10.00";
    let t = parse_transaction(block)?;

    assert_eq!("02/28/2025", t.date);
    assert_eq!("Buy", t.action);
    assert_eq!("FOO BAR BAZ", t.description);
    assert_eq!("10", t.quantity);
    assert_eq!("$1.00", t.price);
    assert_eq!("$0.00", t.fees);
    assert_eq!("$10.00", t.amount);
    assert_eq!(None, t.symbol);
    assert_eq!(None, t.exp_date);
    assert_eq!(None, t.strike);
    assert_eq!(None, t.option_type);
    assert_eq!(None, t.cash_deployed);
    Ok(())
}

#[test]
fn non_numeric_strike_keeps_raw_token() -> Result<()> {
    let block = "02/28/2025    Sell to Open
Trade Details
JEPQ 03/21/2025 $53.00 P
PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25
1
$0.22    $0.66    $21.34";
    let t = parse_transaction(block)?;

    assert_eq!(Some("$53.00".to_owned()), t.strike);
    assert_eq!(None, t.cash_deployed);
    assert_eq!(Some("JEPQ".to_owned()), t.symbol);
    Ok(())
}

#[test]
fn action_may_be_missing() -> Result<()> {
    let block = "02/28/2025
Trade Details
JEPQ 03/21/2025 53.00 P
PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25
1
$0.22    $0.66    $21.34";
    let t = parse_transaction(block)?;

    assert_eq!("02/28/2025", t.date);
    assert_eq!("", t.action);
    Ok(())
}

#[test]
fn blocks_split_in_input_order() {
    let text = "\n-----------\nfirst block\n-----------\n\n   \n-----------\nsecond block\n-----------\n";
    let blocks: Vec<&str> = split_blocks(text).collect();
    assert_eq!(vec!["first block", "second block"], blocks);
}

#[test]
fn empty_input_has_no_blocks() {
    assert_eq!(0, split_blocks("").count());
    assert_eq!(0, split_blocks("\n  \n-----------\n\n").count());
}

#[test]
fn malformed_blocks_are_skipped() {
    let text = format!("{}\n-----------\nnot a transaction\n-----------\n{}", JEPQ_BLOCK, JEPQ_BLOCK);
    let transactions = parse_confirmations(&text);
    assert_eq!(2, transactions.len());
}

#[test]
fn option_fields_from_description() {
    let o = parse_option_fields("SPYI 03/21/2025 48.00 P PUT NEOS S&P 500").unwrap();
    assert_eq!("SPYI", o.symbol);
    assert_eq!("03/21/2025", o.exp_date);
    assert_eq!("48.00", o.strike);
    assert_eq!("P", o.option_type);
    assert_eq!(Some(4800.0), o.cash_deployed);

    assert_eq!(true, parse_option_fields("SPYI 03/21/2025 48.00").is_none());
}
