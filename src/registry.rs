//! Static registry of the Bitcoin Core RPC surface.
//!
//! Every remote procedure the client may call is a variant of [`Method`].
//! The enum, its name mapping and the descriptor table are all generated
//! from one table by `rpc_methods!`, so a name can never exist in one place
//! and be missing from another.
//!
//! The registry is read-only: it is built at compile time and no call ever
//! mutates it.

use std::fmt;
use std::str::FromStr;

/// Functional group a method belongs to, following Bitcoin Core's `help` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodGroup {
    Blockchain,
    Control,
    Generating,
    Mining,
    Network,
    RawTransactions,
    Util,
    Wallet,
}

impl MethodGroup {
    pub const ALL: &'static [MethodGroup] = &[
        MethodGroup::Blockchain,
        MethodGroup::Control,
        MethodGroup::Generating,
        MethodGroup::Mining,
        MethodGroup::Network,
        MethodGroup::RawTransactions,
        MethodGroup::Util,
        MethodGroup::Wallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodGroup::Blockchain => "Blockchain",
            MethodGroup::Control => "Control",
            MethodGroup::Generating => "Generating",
            MethodGroup::Mining => "Mining",
            MethodGroup::Network => "Network",
            MethodGroup::RawTransactions => "Rawtransactions",
            MethodGroup::Util => "Util",
            MethodGroup::Wallet => "Wallet",
        }
    }
}

/// One positional argument of a remote method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub required: bool,
    /// Loose description of acceptable values ("numeric", "hex", "object", ...).
    /// Informational only; values are never checked against it.
    pub hint: &'static str,
}

/// Registry entry for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub method: Method,
    pub name: &'static str,
    pub group: MethodGroup,
    pub description: &'static str,
    pub args: &'static [ArgumentSpec],
}

impl MethodDescriptor {
    /// Smallest accepted argument count: everything up to the last required argument.
    pub fn min_args(&self) -> usize {
        self.args
            .iter()
            .rposition(|arg| arg.required)
            .map_or(0, |idx| idx + 1)
    }

    /// Largest accepted argument count.
    pub fn max_args(&self) -> usize {
        self.args.len()
    }

    /// Whether `count` positional arguments fit this method's signature.
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args()..=self.max_args()).contains(&count)
    }
}

macro_rules! rpc_methods {
    (
        $(
            $variant:ident => $name:literal, $group:ident, $desc:literal,
                [$($kind:ident $arg:literal : $hint:literal),* $(,)?];
        )*
    ) => {
        /// A remote procedure known to the registry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Method {
            $($variant,)*
        }

        impl Method {
            /// Every registered method, in table order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)*];

            /// Wire name as published by the remote service.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Method::$variant => $name,)*
                }
            }

            /// Exact, case-sensitive lookup by wire name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Method::$variant),)*
                    _ => None,
                }
            }
        }

        static DESCRIPTORS: &[MethodDescriptor] = &[
            $(
                MethodDescriptor {
                    method: Method::$variant,
                    name: $name,
                    group: MethodGroup::$group,
                    description: $desc,
                    args: &[
                        $(ArgumentSpec {
                            name: $arg,
                            required: rpc_methods!(@required $kind),
                            hint: $hint,
                        },)*
                    ],
                },
            )*
        ];
    };
    (@required req) => { true };
    (@required opt) => { false };
}

rpc_methods! {
    // == Blockchain ==
    GetBestBlockHash => "getbestblockhash", Blockchain,
        "Returns the hash of the best (tip) block in the most-work fully-validated chain.", [];
    GetBlock => "getblock", Blockchain,
        "Returns block data for the given block hash.",
        [req "blockhash": "hex", opt "verbosity": "numeric"];
    GetBlockchainInfo => "getblockchaininfo", Blockchain,
        "Returns an object containing various state info regarding blockchain processing.", [];
    GetBlockCount => "getblockcount", Blockchain,
        "Returns the height of the most-work fully-validated chain.", [];
    GetBlockHash => "getblockhash", Blockchain,
        "Returns hash of block in best-block-chain at height provided.",
        [req "height": "numeric"];
    GetBlockHeader => "getblockheader", Blockchain,
        "Returns information about the block header.",
        [req "blockhash": "hex", opt "verbose": "boolean"];
    GetBlockStats => "getblockstats", Blockchain,
        "Computes per block statistics for a given window.",
        [req "hash_or_height": "hex or numeric", opt "stats": "array"];
    GetChainTips => "getchaintips", Blockchain,
        "Return information about all known tips in the block tree.", [];
    GetChainTxStats => "getchaintxstats", Blockchain,
        "Compute statistics about the total number and rate of transactions in the chain.",
        [opt "nblocks": "numeric", opt "blockhash": "hex"];
    GetDifficulty => "getdifficulty", Blockchain,
        "Returns the proof-of-work difficulty as a multiple of the minimum difficulty.", [];
    GetMempoolAncestors => "getmempoolancestors", Blockchain,
        "Returns all in-mempool ancestors of a transaction.",
        [req "txid": "hex", opt "verbose": "boolean"];
    GetMempoolDescendants => "getmempooldescendants", Blockchain,
        "Returns all in-mempool descendants of a transaction.",
        [req "txid": "hex", opt "verbose": "boolean"];
    GetMempoolEntry => "getmempoolentry", Blockchain,
        "Returns mempool data for the given transaction.",
        [req "txid": "hex"];
    GetMempoolInfo => "getmempoolinfo", Blockchain,
        "Returns details on the active state of the TX memory pool.", [];
    GetRawMempool => "getrawmempool", Blockchain,
        "Returns all transaction ids in the memory pool.",
        [opt "verbose": "boolean"];
    GetTxOut => "gettxout", Blockchain,
        "Returns details about an unspent transaction output.",
        [req "txid": "hex", req "n": "numeric", opt "include_mempool": "boolean"];
    GetTxOutProof => "gettxoutproof", Blockchain,
        "Returns a hex-encoded proof that the given transactions were included in a block.",
        [req "txids": "array", opt "blockhash": "hex"];
    GetTxOutSetInfo => "gettxoutsetinfo", Blockchain,
        "Returns statistics about the unspent transaction output set.", [];
    PreciousBlock => "preciousblock", Blockchain,
        "Treats a block as if it were received before others with the same work.",
        [req "blockhash": "hex"];
    PruneBlockchain => "pruneblockchain", Blockchain,
        "Prune the blockchain up to the given height or timestamp.",
        [req "height": "numeric"];
    SaveMempool => "savemempool", Blockchain,
        "Dumps the mempool to disk.", [];
    ScanTxOutSet => "scantxoutset", Blockchain,
        "Scans the unspent transaction output set for entries that match certain output descriptors.",
        [req "action": "string", opt "scanobjects": "array"];
    VerifyChain => "verifychain", Blockchain,
        "Verifies blockchain database.",
        [opt "checklevel": "numeric", opt "nblocks": "numeric"];
    VerifyTxOutProof => "verifytxoutproof", Blockchain,
        "Verifies that a proof points to a transaction in a block.",
        [req "proof": "hex"];

    // == Control ==
    GetMemoryInfo => "getmemoryinfo", Control,
        "Returns an object containing information about memory usage.",
        [opt "mode": "string"];
    GetRpcInfo => "getrpcinfo", Control,
        "Returns details of the RPC server.", [];
    Help => "help", Control,
        "List all commands, or get help for a specified command.",
        [opt "command": "string"];
    Logging => "logging", Control,
        "Gets and sets the logging configuration.",
        [opt "include": "array", opt "exclude": "array"];
    Stop => "stop", Control,
        "Stop the Bitcoin server.", [];
    Uptime => "uptime", Control,
        "Returns the total uptime of the server.", [];

    // == Generating ==
    Generate => "generate", Generating,
        "Mine up to nblocks blocks immediately to an address in the wallet.",
        [req "nblocks": "numeric", opt "maxtries": "numeric"];
    GenerateToAddress => "generatetoaddress", Generating,
        "Mine blocks immediately to a specified address.",
        [req "nblocks": "numeric", req "address": "string", opt "maxtries": "numeric"];

    // == Mining ==
    GetBlockTemplate => "getblocktemplate", Mining,
        "Returns data needed to construct a block to work on.",
        [opt "template_request": "object"];
    GetMiningInfo => "getmininginfo", Mining,
        "Returns a json object containing mining-related information.", [];
    GetNetworkHashPs => "getnetworkhashps", Mining,
        "Returns the estimated network hashes per second based on the last n blocks.",
        [opt "nblocks": "numeric", opt "height": "numeric"];
    PrioritiseTransaction => "prioritisetransaction", Mining,
        "Accepts the transaction into mined blocks at a higher (or lower) priority.",
        [req "txid": "hex", opt "dummy": "null", req "fee_delta": "numeric"];
    SubmitBlock => "submitblock", Mining,
        "Attempts to submit new block to network.",
        [req "hexdata": "hex", opt "dummy": "string"];
    SubmitHeader => "submitheader", Mining,
        "Decode the given hexdata as a header and submit it as a candidate chain tip if valid.",
        [req "hexdata": "hex"];

    // == Network ==
    AddNode => "addnode", Network,
        "Attempts to add or remove a node from the addnode list.",
        [req "node": "string", req "command": "string"];
    ClearBanned => "clearbanned", Network,
        "Clear all banned IPs.", [];
    DisconnectNode => "disconnectnode", Network,
        "Immediately disconnects from the specified peer node.",
        [opt "address": "string", opt "nodeid": "numeric"];
    GetAddedNodeInfo => "getaddednodeinfo", Network,
        "Returns information about the given added node, or all added nodes.",
        [opt "node": "string"];
    GetConnectionCount => "getconnectioncount", Network,
        "Returns the number of connections to other nodes.", [];
    GetNetTotals => "getnettotals", Network,
        "Returns information about network traffic.", [];
    GetNetworkInfo => "getnetworkinfo", Network,
        "Returns an object containing various state info regarding P2P networking.", [];
    GetNodeAddresses => "getnodeaddresses", Network,
        "Return known addresses which can potentially be used to find new nodes in the network.",
        [opt "count": "numeric"];
    GetPeerInfo => "getpeerinfo", Network,
        "Returns data about each connected network node.", [];
    ListBanned => "listbanned", Network,
        "List all banned IPs/Subnets.", [];
    Ping => "ping", Network,
        "Requests that a ping be sent to all other nodes, to measure ping time.", [];
    SetBan => "setban", Network,
        "Attempts to add or remove an IP/Subnet from the banned list.",
        [req "subnet": "string", req "command": "string", opt "bantime": "numeric", opt "absolute": "boolean"];
    SetNetworkActive => "setnetworkactive", Network,
        "Disable/enable all p2p network activity.",
        [req "state": "boolean"];

    // == Rawtransactions ==
    AnalyzePsbt => "analyzepsbt", RawTransactions,
        "Analyzes and provides information about the current status of a PSBT and its inputs.",
        [req "psbt": "base64"];
    CombinePsbt => "combinepsbt", RawTransactions,
        "Combine multiple partially signed Bitcoin transactions into one transaction.",
        [req "txs": "array"];
    CombineRawTransaction => "combinerawtransaction", RawTransactions,
        "Combine multiple partially signed transactions into one transaction.",
        [req "txs": "array"];
    ConvertToPsbt => "converttopsbt", RawTransactions,
        "Converts a network serialized transaction to a PSBT.",
        [req "hexstring": "hex", opt "permitsigdata": "boolean", opt "iswitness": "boolean"];
    CreatePsbt => "createpsbt", RawTransactions,
        "Creates a transaction in the Partially Signed Transaction format.",
        [req "inputs": "array", req "outputs": "array", opt "locktime": "numeric", opt "replaceable": "boolean"];
    CreateRawTransaction => "createrawtransaction", RawTransactions,
        "Create a transaction spending the given inputs and creating new outputs.",
        [req "inputs": "array", req "outputs": "array", opt "locktime": "numeric", opt "replaceable": "boolean"];
    DecodePsbt => "decodepsbt", RawTransactions,
        "Return a JSON object representing the serialized, base64-encoded partially signed Bitcoin transaction.",
        [req "psbt": "base64"];
    DecodeRawTransaction => "decoderawtransaction", RawTransactions,
        "Return a JSON object representing the serialized, hex-encoded transaction.",
        [req "hexstring": "hex", opt "iswitness": "boolean"];
    DecodeScript => "decodescript", RawTransactions,
        "Decode a hex-encoded script.",
        [req "hexstring": "hex"];
    FinalizePsbt => "finalizepsbt", RawTransactions,
        "Finalize the inputs of a PSBT.",
        [req "psbt": "base64", opt "extract": "boolean"];
    FundRawTransaction => "fundrawtransaction", RawTransactions,
        "Add inputs to a transaction until it has enough in value to meet its out value.",
        [req "hexstring": "hex", opt "options": "object", opt "iswitness": "boolean"];
    GetRawTransaction => "getrawtransaction", RawTransactions,
        "Return the raw transaction data.",
        [req "txid": "hex", opt "verbose": "boolean", opt "blockhash": "hex"];
    JoinPsbts => "joinpsbts", RawTransactions,
        "Joins multiple distinct PSBTs with different inputs and outputs into one PSBT.",
        [req "txs": "array"];
    SendRawTransaction => "sendrawtransaction", RawTransactions,
        "Submits raw transaction (serialized, hex-encoded) to local node and network.",
        [req "hexstring": "hex", opt "maxfeerate": "numeric or boolean"];
    SignRawTransactionWithKey => "signrawtransactionwithkey", RawTransactions,
        "Sign inputs for raw transaction using the given private keys.",
        [req "hexstring": "hex", req "privkeys": "array", opt "prevtxs": "array", opt "sighashtype": "string"];
    TestMempoolAccept => "testmempoolaccept", RawTransactions,
        "Returns result of mempool acceptance tests indicating if raw transaction would be accepted by mempool.",
        [req "rawtxs": "array", opt "maxfeerate": "numeric or boolean"];
    UtxoUpdatePsbt => "utxoupdatepsbt", RawTransactions,
        "Updates all segwit inputs and outputs in a PSBT with data from output descriptors, the UTXO set or the mempool.",
        [req "psbt": "base64", opt "descriptors": "array"];

    // == Util ==
    CreateMultisig => "createmultisig", Util,
        "Creates a multi-signature address with n signature of m keys required.",
        [req "nrequired": "numeric", req "keys": "array", opt "address_type": "string"];
    DeriveAddresses => "deriveaddresses", Util,
        "Derives one or more addresses corresponding to an output descriptor.",
        [req "descriptor": "string", opt "range": "numeric or array"];
    EstimateSmartFee => "estimatesmartfee", Util,
        "Estimates the approximate fee per kilobyte needed for a transaction to begin confirmation within conf_target blocks.",
        [req "conf_target": "numeric", opt "estimate_mode": "string"];
    GetDescriptorInfo => "getdescriptorinfo", Util,
        "Analyses a descriptor.",
        [req "descriptor": "string"];
    SignMessageWithPrivKey => "signmessagewithprivkey", Util,
        "Sign a message with the private key of an address.",
        [req "privkey": "string", req "message": "string"];
    ValidateAddress => "validateaddress", Util,
        "Return information about the given bitcoin address.",
        [req "address": "string"];
    VerifyMessage => "verifymessage", Util,
        "Verify a signed message.",
        [req "address": "string", req "signature": "base64", req "message": "string"];

    // == Wallet ==
    AbandonTransaction => "abandontransaction", Wallet,
        "Mark in-wallet transaction as abandoned.",
        [req "txid": "hex"];
    AbortRescan => "abortrescan", Wallet,
        "Stops current wallet rescan triggered by an RPC call.", [];
    AddMultisigAddress => "addmultisigaddress", Wallet,
        "Add an nrequired-to-sign multisignature address to the wallet.",
        [req "nrequired": "numeric", req "keys": "array", opt "label": "string", opt "address_type": "string"];
    BackupWallet => "backupwallet", Wallet,
        "Safely copies current wallet file to destination.",
        [req "destination": "string"];
    BumpFee => "bumpfee", Wallet,
        "Bumps the fee of an opt-in-RBF transaction, replacing it with a new transaction.",
        [req "txid": "hex", opt "options": "object"];
    CreateWallet => "createwallet", Wallet,
        "Creates and loads a new wallet.",
        [req "wallet_name": "string", opt "disable_private_keys": "boolean", opt "blank": "boolean"];
    DumpPrivKey => "dumpprivkey", Wallet,
        "Reveals the private key corresponding to an address.",
        [req "address": "string"];
    DumpWallet => "dumpwallet", Wallet,
        "Dumps all wallet keys in a human-readable format to a server-side file.",
        [req "filename": "string"];
    EncryptWallet => "encryptwallet", Wallet,
        "Encrypts the wallet with a passphrase.",
        [req "passphrase": "string"];
    GetAddressesByLabel => "getaddressesbylabel", Wallet,
        "Returns the list of addresses assigned the specified label.",
        [req "label": "string"];
    GetAddressInfo => "getaddressinfo", Wallet,
        "Return information about the given bitcoin address.",
        [req "address": "string"];
    GetBalance => "getbalance", Wallet,
        "Returns the total available balance.",
        [opt "dummy": "string", opt "minconf": "numeric", opt "include_watchonly": "boolean"];
    GetBalances => "getbalances", Wallet,
        "Returns an object with all balances in BTC.", [];
    GetNewAddress => "getnewaddress", Wallet,
        "Returns a new Bitcoin address for receiving payments.",
        [opt "label": "string", opt "address_type": "string"];
    GetRawChangeAddress => "getrawchangeaddress", Wallet,
        "Returns a new Bitcoin address, for receiving change.",
        [opt "address_type": "string"];
    GetReceivedByAddress => "getreceivedbyaddress", Wallet,
        "Returns the total amount received by the given address in transactions with at least minconf confirmations.",
        [req "address": "string", opt "minconf": "numeric"];
    GetReceivedByLabel => "getreceivedbylabel", Wallet,
        "Returns the total amount received by addresses with label in transactions with at least minconf confirmations.",
        [req "label": "string", opt "minconf": "numeric"];
    GetTransaction => "gettransaction", Wallet,
        "Get detailed information about in-wallet transaction.",
        [req "txid": "hex", opt "include_watchonly": "boolean"];
    GetUnconfirmedBalance => "getunconfirmedbalance", Wallet,
        "Returns the server's total unconfirmed balance.", [];
    GetWalletInfo => "getwalletinfo", Wallet,
        "Returns an object containing various wallet state info.", [];
    ImportAddress => "importaddress", Wallet,
        "Adds an address or script that can be watched as if it were in your wallet but cannot be used to spend.",
        [req "address": "string", opt "label": "string", opt "rescan": "boolean", opt "p2sh": "boolean"];
    ImportMulti => "importmulti", Wallet,
        "Import addresses/scripts (with private or public keys, redeem script), rescanning all addresses in one-shot-only.",
        [req "requests": "array", opt "options": "object"];
    ImportPrivKey => "importprivkey", Wallet,
        "Adds a private key to your wallet.",
        [req "privkey": "string", opt "label": "string", opt "rescan": "boolean"];
    ImportPrunedFunds => "importprunedfunds", Wallet,
        "Imports funds without rescan.",
        [req "rawtransaction": "hex", req "txoutproof": "hex"];
    ImportPubKey => "importpubkey", Wallet,
        "Adds a public key that can be watched as if it were in your wallet but cannot be used to spend.",
        [req "pubkey": "hex", opt "label": "string", opt "rescan": "boolean"];
    ImportWallet => "importwallet", Wallet,
        "Imports keys from a wallet dump file.",
        [req "filename": "string"];
    KeypoolRefill => "keypoolrefill", Wallet,
        "Fills the keypool.",
        [opt "newsize": "numeric"];
    ListAddressGroupings => "listaddressgroupings", Wallet,
        "Lists groups of addresses which have had their common ownership made public.", [];
    ListLabels => "listlabels", Wallet,
        "Returns the list of all labels, or labels that are assigned to addresses with a specific purpose.",
        [opt "purpose": "string"];
    ListLockUnspent => "listlockunspent", Wallet,
        "Returns list of temporarily unspendable outputs.", [];
    ListReceivedByAddress => "listreceivedbyaddress", Wallet,
        "List balances by receiving address.",
        [opt "minconf": "numeric", opt "include_empty": "boolean", opt "include_watchonly": "boolean", opt "address_filter": "string"];
    ListReceivedByLabel => "listreceivedbylabel", Wallet,
        "List received transactions by label.",
        [opt "minconf": "numeric", opt "include_empty": "boolean", opt "include_watchonly": "boolean"];
    ListSinceBlock => "listsinceblock", Wallet,
        "Get all transactions in blocks since block blockhash, or all transactions if omitted.",
        [opt "blockhash": "hex", opt "target_confirmations": "numeric", opt "include_watchonly": "boolean", opt "include_removed": "boolean"];
    ListTransactions => "listtransactions", Wallet,
        "Returns up to count most recent transactions skipping the first skip transactions.",
        [opt "label": "string", opt "count": "numeric", opt "skip": "numeric", opt "include_watchonly": "boolean"];
    ListUnspent => "listunspent", Wallet,
        "Returns array of unspent transaction outputs with between minconf and maxconf confirmations.",
        [opt "minconf": "numeric", opt "maxconf": "numeric", opt "addresses": "array", opt "include_unsafe": "boolean", opt "query_options": "object"];
    ListWalletDir => "listwalletdir", Wallet,
        "Returns a list of wallets in the wallet directory.", [];
    ListWallets => "listwallets", Wallet,
        "Returns a list of currently loaded wallets.", [];
    LoadWallet => "loadwallet", Wallet,
        "Loads a wallet from a wallet file or directory.",
        [req "filename": "string"];
    LockUnspent => "lockunspent", Wallet,
        "Updates list of temporarily unspendable outputs.",
        [req "unlock": "boolean", opt "transactions": "array"];
    RemovePrunedFunds => "removeprunedfunds", Wallet,
        "Deletes the specified transaction from the wallet.",
        [req "txid": "hex"];
    RescanBlockchain => "rescanblockchain", Wallet,
        "Rescan the local blockchain for wallet related transactions.",
        [opt "start_height": "numeric", opt "stop_height": "numeric"];
    SendMany => "sendmany", Wallet,
        "Send multiple times.",
        [req "dummy": "string", req "amounts": "object", opt "minconf": "numeric", opt "comment": "string",
         opt "subtractfeefrom": "array", opt "replaceable": "boolean", opt "conf_target": "numeric", opt "estimate_mode": "string"];
    SendToAddress => "sendtoaddress", Wallet,
        "Send an amount to a given address.",
        [req "address": "string", req "amount": "numeric", opt "comment": "string", opt "comment_to": "string",
         opt "subtractfeefromamount": "boolean", opt "replaceable": "boolean", opt "conf_target": "numeric", opt "estimate_mode": "string"];
    SetHdSeed => "sethdseed", Wallet,
        "Set or generate a new HD wallet seed.",
        [opt "newkeypool": "boolean", opt "seed": "string"];
    SetLabel => "setlabel", Wallet,
        "Sets the label associated with the given address.",
        [req "address": "string", req "label": "string"];
    SetTxFee => "settxfee", Wallet,
        "Set the transaction fee per kB for this wallet.",
        [req "amount": "numeric"];
    SignMessage => "signmessage", Wallet,
        "Sign a message with the private key of an address.",
        [req "address": "string", req "message": "string"];
    SignRawTransactionWithWallet => "signrawtransactionwithwallet", Wallet,
        "Sign inputs for raw transaction using keys held in the wallet.",
        [req "hexstring": "hex", opt "prevtxs": "array", opt "sighashtype": "string"];
    UnloadWallet => "unloadwallet", Wallet,
        "Unloads the wallet referenced by the request endpoint, or the specified wallet.",
        [opt "wallet_name": "string"];
    WalletCreateFundedPsbt => "walletcreatefundedpsbt", Wallet,
        "Creates and funds a transaction in the Partially Signed Transaction format.",
        [req "inputs": "array", req "outputs": "array", opt "locktime": "numeric", opt "options": "object", opt "bip32derivs": "boolean"];
    WalletLock => "walletlock", Wallet,
        "Removes the wallet encryption key from memory, locking the wallet.", [];
    WalletPassphrase => "walletpassphrase", Wallet,
        "Stores the wallet decryption key in memory for timeout seconds.",
        [req "passphrase": "string", req "timeout": "numeric"];
    WalletPassphraseChange => "walletpassphrasechange", Wallet,
        "Changes the wallet passphrase from oldpassphrase to newpassphrase.",
        [req "oldpassphrase": "string", req "newpassphrase": "string"];
    WalletProcessPsbt => "walletprocesspsbt", Wallet,
        "Update a PSBT with input information from our wallet and then sign inputs that we can sign for.",
        [req "psbt": "base64", opt "sign": "boolean", opt "sighashtype": "string", opt "bip32derivs": "boolean"];
}

impl Method {
    /// Registry entry for this method.
    pub fn descriptor(self) -> &'static MethodDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn group(self) -> MethodGroup {
        self.descriptor().group
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `Method::from_str` for names outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown RPC method: {0}")]
pub struct UnknownMethodName(pub String);

impl FromStr for Method {
    type Err = UnknownMethodName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::from_name(s).ok_or_else(|| UnknownMethodName(s.to_string()))
    }
}

/// Whether `name` is a registered method.
pub fn exists(name: &str) -> bool {
    Method::from_name(name).is_some()
}

/// Registry entry for `name`, if registered.
pub fn describe(name: &str) -> Option<&'static MethodDescriptor> {
    Method::from_name(name).map(Method::descriptor)
}

/// Number of declared positional arguments for `name`, if registered.
pub fn arg_count(name: &str) -> Option<usize> {
    describe(name).map(MethodDescriptor::max_args)
}

/// Every descriptor in table order.
pub fn descriptors() -> &'static [MethodDescriptor] {
    DESCRIPTORS
}

/// Descriptors belonging to `group`.
pub fn methods_in(group: MethodGroup) -> impl Iterator<Item = &'static MethodDescriptor> {
    DESCRIPTORS.iter().filter(move |d| d.group == group)
}
