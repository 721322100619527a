use alloy_sol_types::sol;

sol! {
    /// The slice of the timelock controller interface this crate talks to.
    interface Timelock {
        function schedule(
            address target,
            uint256 value,
            bytes calldata data,
            bytes32 predecessor,
            bytes32 salt,
            uint256 delay
        ) external;

        function execute(
            address target,
            uint256 value,
            bytes calldata payload,
            bytes32 predecessor,
            bytes32 salt
        ) external payable;

        function isOperation(bytes32 id) external view returns (bool);

        function isOperationPending(bytes32 id) external view returns (bool);

        function isOperationReady(bytes32 id) external view returns (bool);

        function isOperationDone(bytes32 id) external view returns (bool);

        function getTimestamp(bytes32 id) external view returns (uint256);

        function getMinDelay() external view returns (uint256);
    }
}
