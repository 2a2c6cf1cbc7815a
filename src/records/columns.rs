//! Column headers of the fee confirmation and policy roster reports

pub const POLICY_NO: &str = "保单号";
pub const ENDORSEMENT_SEQ: &str = "批单序号";
/// Roster name of the endorsement sequence
pub const ENDORSEMENT_NO: &str = "批单号";
pub const POLICYHOLDER: &str = "投保人";
pub const INSURED_NAME: &str = "被保人名称";
pub const INSTALLMENT: &str = "缴费期次";
pub const PRODUCT_CODE: &str = "险种代码";
pub const PRODUCT_NAME: &str = "险种名称";
pub const BRANCH: &str = "归属机构";
pub const CHANNEL: &str = "渠道";
pub const CONFIRMED_AT: &str = "承保确认时间";
pub const ACCRUED_AT: &str = "费用计提时间";
pub const UNDERWRITTEN_AT: &str = "核保时间";
pub const COVERAGE_START: &str = "保险起期";
pub const RECEIVED_AT: &str = "实收时间";
pub const AGENT: &str = "业务员";
pub const TOTAL_FEE_RATIO: &str = "总费用比例(%)";
pub const TOTAL_FEE_AMOUNT: &str = "总费用金额";
pub const COMMISSION_RATIO: &str = "手续费比例(%)";
pub const COMMISSION_AMOUNT: &str = "手续费金额";
pub const DEVELOPMENT_FEE_RATIO: &str = "展业费比例(%)";
pub const DEVELOPMENT_FEE_AMOUNT: &str = "展业费金额";
pub const BONUS_RATIO: &str = "绩效提奖比例(%)";
pub const BONUS_AMOUNT: &str = "绩效提奖金额";
pub const PREMIUM: &str = "保费";
pub const INTERVENTION_STATUS: &str = "干预状态";
pub const INSURED_AMOUNT: &str = "保险金额";
/// Intervention status column after the insured-amount correction
pub const LIABILITY_INSURED_AMOUNT: &str = "保额（仅诉责）";

/// Identifier columns of the confirmation report that must stay text
pub const FEE_TEXT_COLUMNS: [&str; 2] = [ENDORSEMENT_SEQ, PRODUCT_CODE];

/// Identifier columns of the roster report that must stay text
pub const ROSTER_TEXT_COLUMNS: [&str; 2] = [ENDORSEMENT_NO, PRODUCT_CODE];

/// Columns the confirmation report must provide
pub const FEE_REQUIRED_COLUMNS: [&str; 23] = [
    POLICY_NO,
    ENDORSEMENT_SEQ,
    INSTALLMENT,
    PRODUCT_CODE,
    PRODUCT_NAME,
    BRANCH,
    CHANNEL,
    CONFIRMED_AT,
    ACCRUED_AT,
    UNDERWRITTEN_AT,
    COVERAGE_START,
    RECEIVED_AT,
    AGENT,
    TOTAL_FEE_RATIO,
    TOTAL_FEE_AMOUNT,
    COMMISSION_RATIO,
    COMMISSION_AMOUNT,
    DEVELOPMENT_FEE_RATIO,
    DEVELOPMENT_FEE_AMOUNT,
    BONUS_RATIO,
    BONUS_AMOUNT,
    PREMIUM,
    INTERVENTION_STATUS,
];

/// Columns the roster report must provide
pub const ROSTER_REQUIRED_COLUMNS: [&str; 6] = [
    POLICY_NO,
    ENDORSEMENT_NO,
    PRODUCT_CODE,
    POLICYHOLDER,
    INSURED_NAME,
    INSURED_AMOUNT,
];

/// Output order of a joined fee line
pub const JOINED_COLUMNS: [&str; 25] = [
    POLICY_NO,
    ENDORSEMENT_SEQ,
    POLICYHOLDER,
    INSURED_NAME,
    INSTALLMENT,
    PRODUCT_CODE,
    PRODUCT_NAME,
    BRANCH,
    CHANNEL,
    CONFIRMED_AT,
    ACCRUED_AT,
    UNDERWRITTEN_AT,
    COVERAGE_START,
    RECEIVED_AT,
    AGENT,
    TOTAL_FEE_RATIO,
    TOTAL_FEE_AMOUNT,
    COMMISSION_RATIO,
    COMMISSION_AMOUNT,
    DEVELOPMENT_FEE_RATIO,
    DEVELOPMENT_FEE_AMOUNT,
    BONUS_RATIO,
    BONUS_AMOUNT,
    PREMIUM,
    INTERVENTION_STATUS,
];

/// Output order of a corrected fee line: the joined order with the
/// intervention status renamed
pub const CORRECTED_COLUMNS: [&str; 25] = [
    POLICY_NO,
    ENDORSEMENT_SEQ,
    POLICYHOLDER,
    INSURED_NAME,
    INSTALLMENT,
    PRODUCT_CODE,
    PRODUCT_NAME,
    BRANCH,
    CHANNEL,
    CONFIRMED_AT,
    ACCRUED_AT,
    UNDERWRITTEN_AT,
    COVERAGE_START,
    RECEIVED_AT,
    AGENT,
    TOTAL_FEE_RATIO,
    TOTAL_FEE_AMOUNT,
    COMMISSION_RATIO,
    COMMISSION_AMOUNT,
    DEVELOPMENT_FEE_RATIO,
    DEVELOPMENT_FEE_AMOUNT,
    BONUS_RATIO,
    BONUS_AMOUNT,
    PREMIUM,
    LIABILITY_INSURED_AMOUNT,
];

/// Header of the pivot summary: the two index columns then the sums
pub const PIVOT_COLUMNS: [&str; 4] = [BRANCH, AGENT, DEVELOPMENT_FEE_AMOUNT, BONUS_AMOUNT];
